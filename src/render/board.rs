//! Board projection (agent view): one column per configured status.
//!
//! Columns always render, even when empty, each with a live count badge.
//! Cards are distributed by `ticket.status`; a card whose status matches no
//! configured column is dropped from the projection (it reappears once the
//! vocabulary knows the status).

use owo_colors::OwoColorize;

use crate::types::Ticket;
use crate::vocab::Vocabulary;

use super::{assignee_label, format_timestamp, humanize_issue_type};

/// The whole board, ready to render or to wire affordances against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, status: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}

/// One status column with its count badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub status: String,
    pub label: String,
    pub count: usize,
    pub cards: Vec<CardView>,
}

/// One ticket card. Carries the ticket id so the caller can wire the inline
/// status selector and the one-click resolve affordance; the card itself
/// never mutates anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub subject: String,
    pub created: String,
    pub description: String,
    pub priority_line: String,
    pub issue_line: String,
    pub requester_line: String,
    pub assignee_line: String,
    pub resolution: Option<String>,
}

fn card_view(ticket: &Ticket) -> CardView {
    CardView {
        id: ticket.id.clone(),
        subject: ticket.subject.clone(),
        created: format_timestamp(ticket.created_at.as_deref()),
        description: ticket.description.clone(),
        priority_line: format!("Priority: {}", ticket.priority.to_uppercase()),
        issue_line: format!("Type: {}", humanize_issue_type(&ticket.issue_type)),
        requester_line: format!("Requester: {}", ticket.requester),
        assignee_line: match ticket.assignee.as_deref() {
            Some(name) if !name.trim().is_empty() => format!("Assignee: {}", name),
            _ => assignee_label(None).to_string(),
        },
        resolution: ticket.resolution_notes.clone(),
    }
}

/// Group the filtered sequence into the configured columns.
pub fn build_board(tickets: &[&Ticket], statuses: &Vocabulary) -> BoardView {
    let mut columns: Vec<ColumnView> = statuses
        .entries()
        .iter()
        .map(|entry| ColumnView {
            status: entry.value.clone(),
            label: entry.label.clone(),
            count: 0,
            cards: Vec::new(),
        })
        .collect();

    for ticket in tickets {
        match columns.iter_mut().find(|c| c.status == ticket.status) {
            Some(column) => {
                column.count += 1;
                column.cards.push(card_view(ticket));
            }
            None => {
                tracing::debug!(
                    ticket = %ticket.id,
                    status = %ticket.status,
                    "ticket status matches no board column; card dropped"
                );
            }
        }
    }

    BoardView { columns }
}

/// Render the board as text, columns stacked as sections.
pub fn render_board(board: &BoardView) -> String {
    let mut out = String::new();
    for column in &board.columns {
        out.push_str(&format!(
            "{} {}\n",
            column.label.bold(),
            format!("({})", column.count).dimmed()
        ));
        if column.cards.is_empty() {
            out.push_str(&format!("  {}\n", "no tickets".dimmed()));
        }
        for card in &column.cards {
            out.push_str(&format!(
                "  {} {} {}\n",
                card.id.cyan(),
                card.subject,
                card.created.dimmed()
            ));
            out.push_str(&format!(
                "    {} · {} · {}\n",
                card.priority_line, card.issue_line, card.requester_line
            ));
            out.push_str(&format!("    {}\n", card.assignee_line));
            if let Some(resolution) = &card.resolution {
                out.push_str(&format!("    Resolution: {}\n", resolution));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ticket(id: &str, status: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            subject: format!("subject {}", id),
            description: "details".to_string(),
            requester: "pat@example.com".to_string(),
            issue_type: "software_bug".to_string(),
            priority: "high".to_string(),
            status: status.to_string(),
            assignee: None,
            resolution_notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_every_configured_column_renders_even_when_empty() {
        let statuses = Vocabulary::default_statuses();
        let board = build_board(&[], &statuses);
        assert_eq!(board.columns.len(), 4);
        assert!(board.columns.iter().all(|c| c.count == 0));

        let rendered = render_board(&board);
        assert!(rendered.contains("Waiting on Customer"));
        assert!(rendered.contains("(0)"));
    }

    #[test]
    fn test_cards_distributed_by_status_with_exact_counts() {
        let statuses = Vocabulary::default_statuses();
        let a = make_ticket("t-1", "open");
        let b = make_ticket("t-2", "open");
        let c = make_ticket("t-3", "resolved");
        let board = build_board(&[&a, &b, &c], &statuses);

        let open = board.column("open").unwrap();
        assert_eq!(open.count, 2);
        assert_eq!(open.count, open.cards.len());

        let resolved = board.column("resolved").unwrap();
        assert_eq!(resolved.count, 1);

        let waiting = board.column("waiting_for_customer").unwrap();
        assert_eq!(waiting.count, 0);
        assert!(waiting.cards.is_empty());
    }

    #[test]
    fn test_unmatched_status_card_is_dropped() {
        let statuses = Vocabulary::default_statuses();
        let stray = make_ticket("t-9", "archived");
        let board = build_board(&[&stray], &statuses);
        assert_eq!(board.card_count(), 0);
        assert_eq!(board.columns.len(), 4);
    }

    #[test]
    fn test_card_lines() {
        let statuses = Vocabulary::default_statuses();
        let mut ticket = make_ticket("t-1", "open");
        ticket.assignee = Some("lee".to_string());
        ticket.resolution_notes = Some("Swapped the toner.".to_string());
        let board = build_board(&[&ticket], &statuses);
        let card = &board.column("open").unwrap().cards[0];

        assert_eq!(card.priority_line, "Priority: HIGH");
        assert_eq!(card.issue_line, "Type: software bug");
        assert_eq!(card.assignee_line, "Assignee: lee");
        assert_eq!(card.resolution.as_deref(), Some("Swapped the toner."));
    }

    #[test]
    fn test_card_without_assignee_shows_fallback() {
        let statuses = Vocabulary::default_statuses();
        let ticket = make_ticket("t-1", "open");
        let board = build_board(&[&ticket], &statuses);
        let card = &board.column("open").unwrap().cards[0];
        assert_eq!(card.assignee_line, "Unassigned");
    }

    #[test]
    fn test_column_order_follows_vocabulary() {
        let statuses = Vocabulary::default_statuses();
        let board = build_board(&[], &statuses);
        let order: Vec<&str> = board.columns.iter().map(|c| c.status.as_str()).collect();
        assert_eq!(
            order,
            ["open", "in_progress", "waiting_for_customer", "resolved"]
        );
    }
}
