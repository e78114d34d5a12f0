//! The dashboard engine.
//!
//! A [`Dashboard`] is the single owner of the ticket replica, the stats
//! snapshot, the filter state, the detail selection, and the two per-feed
//! failure surfaces. Nothing here is global: multiple independent instances
//! behave deterministically, which is also what makes the engine testable.
//!
//! Refresh responses are admitted through per-feed sequence gates: each
//! request takes a monotonically increasing number and a response older than
//! the last applied one is discarded, so overlapping periodic and
//! mutation-triggered refreshes cannot apply out of order.

use crate::detail::{DetailController, ReconcileOutcome};
use crate::error::{DeskError, Result};
use crate::filter::{FilterState, filter_tickets};
use crate::remote::TicketApi;
use crate::types::{CreateOutcome, NewTicket, StatsSnapshot, Ticket, TicketPatch};
use crate::vocab::Vocabulary;

/// Orders refresh responses for one feed.
#[derive(Debug, Default)]
struct FeedGate {
    next_seq: u64,
    applied_seq: u64,
}

impl FeedGate {
    /// Allocate the sequence number for a new request.
    fn begin(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Admit a response; false means a newer response already landed.
    fn admit(&mut self, seq: u64) -> bool {
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        true
    }
}

pub struct Dashboard {
    statuses: Vocabulary,
    priorities: Vocabulary,
    tickets: Vec<Ticket>,
    stats: Option<StatsSnapshot>,
    pub filter: FilterState,
    detail: DetailController,
    ticket_feed: FeedGate,
    stats_feed: FeedGate,
    table_error: Option<String>,
    stats_error: Option<String>,
    notice: Option<String>,
}

impl Dashboard {
    pub fn new(statuses: Vocabulary, priorities: Vocabulary) -> Self {
        Self {
            statuses,
            priorities,
            tickets: Vec::new(),
            stats: None,
            filter: FilterState::default(),
            detail: DetailController::new(),
            ticket_feed: FeedGate::default(),
            stats_feed: FeedGate::default(),
            table_error: None,
            stats_error: None,
            notice: None,
        }
    }

    /// Paint a stats snapshot before the first round trip completes.
    pub fn with_initial_stats(mut self, stats: Option<StatsSnapshot>) -> Self {
        self.stats = stats;
        self
    }

    pub fn statuses(&self) -> &Vocabulary {
        &self.statuses
    }

    pub fn priorities(&self) -> &Vocabulary {
        &self.priorities
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.as_ref()
    }

    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// The replica narrowed by the current filter state, in replica order.
    pub fn filtered(&self) -> Vec<&Ticket> {
        filter_tickets(&self.tickets, &self.filter)
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    /// Error text for the ticket-table surface, if its feed last failed.
    pub fn table_error(&self) -> Option<&str> {
        self.table_error.as_deref()
    }

    /// Error text for the stats surface, if its feed last failed.
    pub fn stats_error(&self) -> Option<&str> {
        self.stats_error.as_deref()
    }

    /// One-shot informational notice (e.g. the detail view auto-closing
    /// because its ticket vanished upstream).
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn begin_ticket_refresh(&mut self) -> u64 {
        self.ticket_feed.begin()
    }

    pub fn begin_stats_refresh(&mut self) -> u64 {
        self.stats_feed.begin()
    }

    /// Apply a ticket-list response. On success the replica is replaced
    /// wholesale and the open selection is reconciled; on failure only this
    /// feed's error surface changes. Returns whether the response was
    /// admitted (stale responses are dropped entirely).
    pub fn apply_ticket_refresh(&mut self, seq: u64, outcome: Result<Vec<Ticket>>) -> bool {
        if !self.ticket_feed.admit(seq) {
            tracing::debug!(seq, "discarding stale ticket refresh");
            return false;
        }
        match outcome {
            Ok(tickets) => {
                self.tickets = tickets;
                self.table_error = None;
                if let ReconcileOutcome::ClosedMissing { id } = self.detail.reconcile(&self.tickets)
                {
                    self.notice = Some(format!(
                        "Ticket {} is no longer available; the detail view was closed.",
                        id
                    ));
                }
            }
            Err(err) => {
                self.table_error = Some(err.to_string());
            }
        }
        true
    }

    /// Apply a stats response; independent of the ticket feed.
    pub fn apply_stats_refresh(&mut self, seq: u64, outcome: Result<StatsSnapshot>) -> bool {
        if !self.stats_feed.admit(seq) {
            tracing::debug!(seq, "discarding stale stats refresh");
            return false;
        }
        match outcome {
            Ok(stats) => {
                self.stats = Some(stats);
                self.stats_error = None;
            }
            Err(err) => {
                self.stats_error = Some(err.to_string());
            }
        }
        true
    }

    /// Open the detail view for `id`. Unknown ids are a no-op.
    pub fn open_detail(&mut self, id: &str) -> bool {
        self.detail.open(&self.tickets, id)
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut crate::detail::EditBuffer> {
        self.detail.buffer_mut()
    }
}

/// Refresh both feeds concurrently and apply whatever comes back. The feeds
/// fail independently: a stats error never blanks the ticket table and vice
/// versa.
pub async fn refresh_all(dash: &mut Dashboard, api: &dyn TicketApi) {
    let ticket_seq = dash.begin_ticket_refresh();
    let stats_seq = dash.begin_stats_refresh();
    let (tickets, stats) = futures::join!(api.list_tickets(), api.fetch_stats());
    dash.apply_ticket_refresh(ticket_seq, tickets);
    dash.apply_stats_refresh(stats_seq, stats);
}

/// Save the open detail buffer: one PATCH, then a full refetch of both
/// feeds, and only then the success flash. The ordering guarantees
/// the user sees their own edit reflected (or an error) before any periodic
/// tick can show pre-edit data.
pub async fn save_detail(dash: &mut Dashboard, api: &dyn TicketApi) -> Result<()> {
    submit_patch(dash, api, |buffer| buffer.to_patch()).await
}

/// The detail panel's resolve shortcut: force `resolved`, fall back to the
/// canned note only when the buffer has none.
pub async fn resolve_detail(dash: &mut Dashboard, api: &dyn TicketApi) -> Result<()> {
    submit_patch(dash, api, |buffer| buffer.to_resolve_patch()).await
}

async fn submit_patch<F>(dash: &mut Dashboard, api: &dyn TicketApi, build: F) -> Result<()>
where
    F: FnOnce(&crate::detail::EditBuffer) -> TicketPatch,
{
    let (id, patch) = match (dash.detail.open_id(), dash.detail.buffer()) {
        (Some(id), Some(buffer)) => (id.to_string(), build(buffer)),
        _ => return Ok(()),
    };
    dash.detail.begin_save();
    match api.patch_ticket(&id, &patch).await {
        Ok(()) => {
            refresh_all(dash, api).await;
            dash.detail.save_succeeded();
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            dash.detail.save_failed(message.clone());
            Err(DeskError::Api(message))
        }
    }
}

/// Apply a direct patch (the board's inline status selector path, or the
/// CLI equivalent) and refetch both feeds before returning.
pub async fn patch_and_refresh(
    dash: &mut Dashboard,
    api: &dyn TicketApi,
    id: &str,
    patch: &TicketPatch,
) -> Result<()> {
    if patch.is_empty() {
        return Ok(());
    }
    api.patch_ticket(id, patch).await?;
    refresh_all(dash, api).await;
    Ok(())
}

/// One-click resolve from a board card: patch `{status: resolved}` directly.
pub async fn resolve_ticket(dash: &mut Dashboard, api: &dyn TicketApi, id: &str) -> Result<()> {
    if dash.ticket(id).is_none() {
        return Err(DeskError::TicketNotFound(id.to_string()));
    }
    let patch = TicketPatch {
        status: Some("resolved".to_string()),
        ..Default::default()
    };
    patch_and_refresh(dash, api, id, &patch).await
}

/// Submit a new ticket and bring the replica up to date with it.
pub async fn create_and_refresh(
    dash: &mut Dashboard,
    api: &dyn TicketApi,
    ticket: &NewTicket,
) -> Result<CreateOutcome> {
    let outcome = api.create_ticket(ticket).await?;
    refresh_all(dash, api).await;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selector;

    fn make_ticket(id: &str, status: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            subject: format!("subject {}", id),
            description: String::new(),
            requester: "req@example.com".to_string(),
            issue_type: "network".to_string(),
            priority: "medium".to_string(),
            status: status.to_string(),
            assignee: None,
            resolution_notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Vocabulary::default_statuses(),
            Vocabulary::default_priorities(),
        )
    }

    #[test]
    fn test_refresh_replaces_replica_wholesale() {
        let mut dash = dashboard();
        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-1", "open")]));
        assert_eq!(dash.tickets().len(), 1);

        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-2", "open")]));
        assert_eq!(dash.tickets().len(), 1);
        assert_eq!(dash.tickets()[0].id, "t-2");
    }

    #[test]
    fn test_stale_ticket_response_is_discarded() {
        let mut dash = dashboard();
        let old_seq = dash.begin_ticket_refresh();
        let new_seq = dash.begin_ticket_refresh();

        assert!(dash.apply_ticket_refresh(new_seq, Ok(vec![make_ticket("t-2", "open")])));
        assert!(!dash.apply_ticket_refresh(old_seq, Ok(vec![make_ticket("t-1", "open")])));

        assert_eq!(dash.tickets()[0].id, "t-2");
    }

    #[test]
    fn test_stale_error_cannot_shadow_fresh_success() {
        let mut dash = dashboard();
        let old_seq = dash.begin_ticket_refresh();
        let new_seq = dash.begin_ticket_refresh();

        dash.apply_ticket_refresh(new_seq, Ok(vec![make_ticket("t-1", "open")]));
        dash.apply_ticket_refresh(old_seq, Err(DeskError::Api("boom".to_string())));

        assert_eq!(dash.table_error(), None);
        assert_eq!(dash.tickets().len(), 1);
    }

    #[test]
    fn test_feed_failures_are_independent() {
        let mut dash = dashboard();
        let tseq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(tseq, Ok(vec![make_ticket("t-1", "open")]));

        let sseq = dash.begin_stats_refresh();
        dash.apply_stats_refresh(sseq, Err(DeskError::Api("Unable to load stats".to_string())));

        assert_eq!(dash.stats_error(), Some("Unable to load stats"));
        assert_eq!(dash.table_error(), None);
        assert_eq!(dash.tickets().len(), 1);

        let tseq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(
            tseq,
            Err(DeskError::Api("Unable to load tickets".to_string())),
        );
        // Ticket feed failure keeps the last good replica and does not
        // disturb the stats surface.
        assert_eq!(dash.table_error(), Some("Unable to load tickets"));
        assert_eq!(dash.tickets().len(), 1);
        assert_eq!(dash.stats_error(), Some("Unable to load stats"));
    }

    #[test]
    fn test_successful_refresh_clears_table_error() {
        let mut dash = dashboard();
        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Err(DeskError::Api("down".to_string())));
        assert!(dash.table_error().is_some());

        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![]));
        assert_eq!(dash.table_error(), None);
    }

    #[test]
    fn test_refresh_reconciles_open_selection() {
        let mut dash = dashboard();
        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-1", "open")]));
        assert!(dash.open_detail("t-1"));

        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-1", "in_progress")]));

        let buffer = dash.detail().buffer().unwrap();
        assert_eq!(buffer.status, "in_progress");
    }

    #[test]
    fn test_refresh_closes_selection_for_vanished_ticket() {
        let mut dash = dashboard();
        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-1", "open")]));
        dash.open_detail("t-1");

        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(seq, Ok(vec![make_ticket("t-2", "open")]));

        assert!(!dash.detail().is_open());
        let notice = dash.take_notice().unwrap();
        assert!(notice.contains("t-1"));
        assert_eq!(dash.take_notice(), None);
    }

    #[test]
    fn test_filtered_respects_filter_state() {
        let mut dash = dashboard();
        let seq = dash.begin_ticket_refresh();
        dash.apply_ticket_refresh(
            seq,
            Ok(vec![
                make_ticket("t-1", "open"),
                make_ticket("t-2", "resolved"),
            ]),
        );
        dash.filter.status = Selector::Only("open".to_string());
        let ids: Vec<&str> = dash.filtered().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t-1"]);
    }

    #[test]
    fn test_initial_stats_render_before_first_fetch() {
        let stats = StatsSnapshot {
            total: crate::types::TotalStats { tickets: 7 },
            ..Default::default()
        };
        let dash = dashboard().with_initial_stats(Some(stats));
        assert_eq!(dash.stats().unwrap().total.tickets, 7);
    }

    #[test]
    fn test_open_detail_unknown_id_is_noop() {
        let mut dash = dashboard();
        assert!(!dash.open_detail("t-404"));
        assert!(!dash.detail().is_open());
    }
}
