//! Filtering over the ticket replica.
//!
//! The predicate is pure and deterministic: same collection plus same filter
//! state always yields the same subsequence, in input order. It is cheap
//! enough to run on every control change and every refresh tick; pacing of
//! rapid term edits is the caller's concern.

use unicase::UniCase;

use crate::types::Ticket;

/// A single-field filter control: everything, or exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// Parse a control value; the literal `all` (any case) selects everything.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || UniCase::new(trimmed) == UniCase::new("all") {
            Selector::All
        } else {
            Selector::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(want) => UniCase::new(want.as_str()) == UniCase::new(value),
        }
    }
}

/// Transient, client-held criteria narrowing the visible ticket set.
/// Recomputed from the view surface on every change; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub status: Selector,
    pub priority: Selector,
    pub term: String,
}

/// Return the tickets satisfying all three predicates, preserving input
/// order (stable filter, not a sort).
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filter: &FilterState) -> Vec<&'a Ticket> {
    let term = filter.term.trim().to_lowercase();
    tickets
        .iter()
        .filter(|ticket| {
            filter.status.matches(&ticket.status)
                && filter.priority.matches(&ticket.priority)
                && (term.is_empty() || matches_term(ticket, &term))
        })
        .collect()
}

/// Case-insensitive substring match across the ticket's narrative fields.
fn matches_term(ticket: &Ticket, term: &str) -> bool {
    [
        ticket.subject.as_str(),
        ticket.description.as_str(),
        ticket.requester.as_str(),
        ticket.issue_type.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
