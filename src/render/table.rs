//! Table projection (administrator view).

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::types::Ticket;
use crate::vocab::Vocabulary;

use super::{EMPTY_TABLE_PLACEHOLDER, row_view};

/// A row in the ticket table
#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

/// Render the filtered sequence as a table, one row per ticket. An empty
/// sequence renders the placeholder line instead of a bare header.
pub fn render_table(tickets: &[&Ticket], statuses: &Vocabulary) -> String {
    if tickets.is_empty() {
        return format!("{}\n", EMPTY_TABLE_PLACEHOLDER);
    }

    let rows: Vec<TicketRow> = tickets
        .iter()
        .map(|ticket| {
            let view = row_view(ticket, statuses);
            TicketRow {
                id: view.id,
                subject: view.subject,
                requester: view.requester,
                status: view.status_label,
                priority: view.priority,
                assignee: view.assignee,
                updated: view.updated,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{table}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ticket(id: &str, subject: &str, status: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            subject: subject.to_string(),
            description: String::new(),
            requester: "pat@example.com".to_string(),
            issue_type: "network".to_string(),
            priority: "low".to_string(),
            status: status.to_string(),
            assignee: Some("sam".to_string()),
            resolution_notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_renders_one_row_per_ticket() {
        let statuses = Vocabulary::default_statuses();
        let a = make_ticket("t-1", "VPN down", "open");
        let b = make_ticket("t-2", "Printer jam", "resolved");
        let rendered = render_table(&[&a, &b], &statuses);

        assert!(rendered.contains("VPN down"));
        assert!(rendered.contains("Printer jam"));
        assert!(rendered.contains("Open"));
        assert!(rendered.contains("Resolved"));
        assert!(rendered.contains("Subject"));
    }

    #[test]
    fn test_empty_sequence_renders_placeholder() {
        let statuses = Vocabulary::default_statuses();
        let rendered = render_table(&[], &statuses);
        assert!(rendered.contains(EMPTY_TABLE_PLACEHOLDER));
    }

    #[test]
    fn test_unknown_status_echoes_raw_value() {
        let statuses = Vocabulary::default_statuses();
        let ticket = make_ticket("t-1", "VPN down", "triaged");
        let rendered = render_table(&[&ticket], &statuses);
        assert!(rendered.contains("triaged"));
    }

    #[test]
    fn test_unassigned_fallback_appears() {
        let statuses = Vocabulary::default_statuses();
        let mut ticket = make_ticket("t-1", "VPN down", "open");
        ticket.assignee = None;
        let rendered = render_table(&[&ticket], &statuses);
        assert!(rendered.contains("Unassigned"));
    }
}
