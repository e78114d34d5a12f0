use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A ticket as served by the remote service.
///
/// The engine holds these as a read replica: every successful list fetch
/// replaces the whole collection, and individual records are never mutated
/// in place. `id` is the sole join key between the replica, the filtered
/// view, and the selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "requester_name")]
    pub requester: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "assignee_id")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Server-computed aggregate counts, keyed by the same status/priority
/// vocabularies as `Ticket`. Treated as an opaque display object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total: TotalStats,
    #[serde(default)]
    pub status: BTreeMap<String, u64>,
    #[serde(default)]
    pub priority: BTreeMap<String, u64>,
    #[serde(default)]
    pub issue_type: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    #[serde(default)]
    pub tickets: u64,
}

/// Submission payload for `POST /tickets`.
///
/// `additional_context` is synthesized client-side from the per-issue-type
/// intake fields (see [`crate::form`]); the raw field keys never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub issue_type: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

/// What the service reports back for a created ticket. Only `status` is
/// needed (it tells us whether the ticket was auto-resolved on intake); a
/// malformed success body degrades to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateOutcome {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateOutcome {
    /// Whether the service resolved the ticket at intake time.
    pub fn auto_resolved(&self) -> bool {
        self.status.as_deref() == Some("resolved")
    }
}

/// Partial update payload for `PATCH /tickets/{id}`. `None` fields are
/// omitted from the wire body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.assignee.is_none()
            && self.resolution_notes.is_none()
            && self.priority.is_none()
    }
}
