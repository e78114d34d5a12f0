//! Presentation layer.
//!
//! Two projections over one filtered sequence: a table for the
//! administrator view and a status-column board for the agent view. Both
//! rebuild from scratch on every call: collections are small and
//! rebuild-from-scratch keeps re-entrant renders trivially safe. The
//! renderers never mutate tickets; cards and rows expose ticket ids so the
//! caller can wire mutations.

pub mod board;
pub mod detail;
pub mod table;

pub use board::{BoardView, CardView, ColumnView, build_board, render_board};
pub use detail::render_detail;
pub use table::render_table;

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::types::Ticket;
use crate::vocab::Vocabulary;

pub const EMPTY_TABLE_PLACEHOLDER: &str = "No tickets match the current filters.";
pub const UNASSIGNED_LABEL: &str = "Unassigned";
const MISSING_TIMESTAMP: &str = "—";

/// Format a service timestamp for display ("Jul 12 14:05"). Absent or
/// unparsable values render as an em dash.
pub fn format_timestamp(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.strftime("%b %d %H:%M").to_string())
        .unwrap_or_else(|| MISSING_TIMESTAMP.to_string())
}

/// The service emits RFC 3339 timestamps but some deployments drop the
/// offset; accept both.
fn parse_timestamp(raw: &str) -> Option<DateTime> {
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).datetime());
    }
    raw.parse::<DateTime>().ok()
}

/// Display form of an optional assignee.
pub fn assignee_label(assignee: Option<&str>) -> &str {
    match assignee {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNASSIGNED_LABEL,
    }
}

/// Issue types use snake_case on the wire; space them for humans.
pub fn humanize_issue_type(issue_type: &str) -> String {
    issue_type.replace('_', " ")
}

/// One display-ready row of ticket fields, shared by both projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRowView {
    pub id: String,
    pub subject: String,
    pub requester: String,
    /// Raw status value, kept so affordances can bind to it.
    pub status: String,
    pub status_label: String,
    pub priority: String,
    pub assignee: String,
    pub updated: String,
}

pub fn row_view(ticket: &Ticket, statuses: &Vocabulary) -> TicketRowView {
    TicketRowView {
        id: ticket.id.clone(),
        subject: ticket.subject.clone(),
        requester: ticket.requester.clone(),
        status: ticket.status.clone(),
        status_label: statuses.label_for(&ticket.status).to_string(),
        priority: ticket.priority.clone(),
        assignee: assignee_label(ticket.assignee.as_deref()).to_string(),
        updated: format_timestamp(ticket.updated_at.as_deref()),
    }
}
