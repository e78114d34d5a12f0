//! Intake form assembly for public ticket submission.
//!
//! The submission form carries per-issue-type context fields. Only the
//! fields belonging to the selected issue type participate; their values are
//! folded into a single labeled `additional_context` block and the raw field
//! keys never reach the wire payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::NewTicket;

/// One context field the intake form offers for a given issue type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeField {
    /// Form key, matched against caller-provided values.
    pub name: String,
    /// Human-readable label used in the synthesized context line.
    pub label: String,
}

impl IntakeField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Issue type → context fields shown for it.
pub type IntakeSections = BTreeMap<String, Vec<IntakeField>>;

/// The intake sections the service's stock form ships with.
pub fn default_intake_sections() -> IntakeSections {
    let mut sections = BTreeMap::new();
    sections.insert(
        "login_issue".to_string(),
        vec![IntakeField::new("affected_account", "Affected account")],
    );
    sections.insert(
        "network".to_string(),
        vec![IntakeField::new("office_location", "Office location")],
    );
    sections.insert(
        "hardware".to_string(),
        vec![IntakeField::new("asset_tag", "Asset tag")],
    );
    sections.insert(
        "software_bug".to_string(),
        vec![
            IntakeField::new("application", "Application"),
            IntakeField::new("steps_to_reproduce", "Steps to reproduce"),
        ],
    );
    sections.insert(
        "billing".to_string(),
        vec![IntakeField::new("invoice_number", "Invoice number")],
    );
    sections.insert("other".to_string(), Vec::new());
    sections
}

/// Everything the submitter typed, before payload assembly.
#[derive(Debug, Clone, Default)]
pub struct TicketDraft {
    pub subject: String,
    pub description: String,
    pub issue_type: String,
    pub priority: String,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    /// Raw `(field name, value)` pairs from the form surface.
    pub context: Vec<(String, String)>,
}

/// Assemble the create payload.
///
/// Context lines are emitted in the section's configured field order, one
/// `"<Label>: <value>"` line per non-empty trimmed value. Values for fields
/// outside the selected issue type's section are discarded, mirroring the
/// form resetting inactive sections on toggle.
pub fn build_create_payload(draft: &TicketDraft, sections: &IntakeSections) -> NewTicket {
    let mut lines = Vec::new();
    if let Some(fields) = sections.get(&draft.issue_type) {
        for field in fields {
            let value = draft
                .context
                .iter()
                .find(|(name, _)| name == &field.name)
                .map(|(_, value)| value.trim())
                .unwrap_or("");
            if !value.is_empty() {
                lines.push(format!("{}: {}", field.label, value));
            }
        }
    }

    NewTicket {
        subject: draft.subject.clone(),
        description: draft.description.clone(),
        issue_type: draft.issue_type.clone(),
        priority: draft.priority.clone(),
        requester_name: draft.requester_name.clone(),
        requester_email: draft.requester_email.clone(),
        additional_context: if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        },
    }
}
