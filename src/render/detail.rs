//! Detail panel rendering for the focused single-ticket view.

use owo_colors::OwoColorize;

use crate::detail::{EditBuffer, Flash, FlashKind};
use crate::types::Ticket;
use crate::vocab::Vocabulary;

use super::{assignee_label, format_timestamp, humanize_issue_type};

/// Render the detail panel: subject and status pill, the meta block, the
/// editable fields as currently buffered, and the transient flash line.
pub fn render_detail(
    ticket: &Ticket,
    buffer: &EditBuffer,
    flash: &Flash,
    statuses: &Vocabulary,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        ticket.subject.bold(),
        format!("[{}]", statuses.label_for(&ticket.status)).dimmed()
    ));
    out.push_str(&format!("Requester: {}\n", ticket.requester));
    out.push_str(&format!(
        "Issue type: {}\n",
        humanize_issue_type(&ticket.issue_type)
    ));
    out.push_str(&format!("Priority: {}\n", ticket.priority));
    out.push_str(&format!(
        "Created: {}\n",
        format_timestamp(ticket.created_at.as_deref())
    ));
    out.push_str(&format!(
        "Updated: {}\n",
        format_timestamp(ticket.updated_at.as_deref())
    ));
    out.push('\n');
    out.push_str(&format!(
        "Status: {}\n",
        statuses.label_for(&buffer.status)
    ));
    out.push_str(&format!(
        "Assignee: {}\n",
        assignee_label(Some(buffer.assignee.as_str()))
    ));
    if !buffer.resolution_notes.trim().is_empty() {
        out.push_str(&format!("Resolution notes: {}\n", buffer.resolution_notes));
    }
    match flash.kind {
        FlashKind::Idle => {}
        FlashKind::Saving => out.push_str(&format!("{}\n", flash.text.dimmed())),
        FlashKind::Success => out.push_str(&format!("{}\n", flash.text.green())),
        FlashKind::Error => out.push_str(&format!("{}\n", flash.text.red())),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ticket() -> Ticket {
        Ticket {
            id: "t-1".to_string(),
            subject: "VPN drops".to_string(),
            description: String::new(),
            requester: "dana@example.com".to_string(),
            issue_type: "login_issue".to_string(),
            priority: "high".to_string(),
            status: "open".to_string(),
            assignee: None,
            resolution_notes: None,
            created_at: Some("2026-07-01T09:15:00Z".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_detail_renders_meta_and_buffer() {
        let ticket = make_ticket();
        let buffer = EditBuffer::seed(&ticket);
        let rendered = render_detail(
            &ticket,
            &buffer,
            &Flash::idle(),
            &Vocabulary::default_statuses(),
        );
        assert!(rendered.contains("VPN drops"));
        assert!(rendered.contains("Issue type: login issue"));
        assert!(rendered.contains("Created: Jul 01 09:15"));
        assert!(rendered.contains("Assignee: Unassigned"));
        assert!(!rendered.contains("Resolution notes:"));
    }

    #[test]
    fn test_detail_shows_flash_text() {
        let ticket = make_ticket();
        let buffer = EditBuffer::seed(&ticket);
        let rendered = render_detail(
            &ticket,
            &buffer,
            &Flash::error("Unable to update ticket"),
            &Vocabulary::default_statuses(),
        );
        assert!(rendered.contains("Unable to update ticket"));
    }
}
