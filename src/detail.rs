//! Selection/detail state management.
//!
//! At most one ticket is "open" at a time. The open ticket carries an edit
//! buffer seeded from the replica record; background refreshes re-derive the
//! buffer from fresh data unless a save is in flight, so an edit in progress
//! is never clobbered mid-keystroke.

use crate::types::{Ticket, TicketPatch};

/// Canned resolution note used by the resolve shortcut when the buffer has
/// nothing better.
pub const RESOLVED_VIA_DASHBOARD: &str = "Resolved via dashboard action.";

/// Transient status line shown in the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlashKind {
    #[default]
    Idle,
    Saving,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn saving() -> Self {
        Self {
            kind: FlashKind::Saving,
            text: "Saving…".to_string(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.kind == FlashKind::Saving
    }
}

/// The editable fields of the open ticket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    pub status: String,
    pub assignee: String,
    pub resolution_notes: String,
}

impl EditBuffer {
    /// Seed from a replica record.
    pub fn seed(ticket: &Ticket) -> Self {
        Self {
            status: ticket.status.clone(),
            assignee: ticket.assignee.clone().unwrap_or_default(),
            resolution_notes: ticket.resolution_notes.clone().unwrap_or_default(),
        }
    }

    /// Build the save payload. Empty assignee/notes map to omitted fields,
    /// the way the panel form submits them.
    pub fn to_patch(&self) -> TicketPatch {
        TicketPatch {
            status: Some(self.status.clone()),
            assignee: non_empty(&self.assignee),
            resolution_notes: non_empty(&self.resolution_notes),
            priority: None,
        }
    }

    /// Build the resolve-shortcut payload: force `resolved`, keep the
    /// buffer's notes when present, else fall back to the canned note.
    pub fn to_resolve_patch(&self) -> TicketPatch {
        TicketPatch {
            status: Some("resolved".to_string()),
            assignee: non_empty(&self.assignee),
            resolution_notes: Some(
                non_empty(&self.resolution_notes)
                    .unwrap_or_else(|| RESOLVED_VIA_DASHBOARD.to_string()),
            ),
            priority: None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// What a reconciliation pass did to the open selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No selection was open, or a save is in flight.
    Untouched,
    /// The open buffer was re-seeded from the fresh record.
    Reseeded,
    /// The open id vanished from the replica; the selection was closed.
    ClosedMissing { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum State {
    #[default]
    Closed,
    Open {
        id: String,
        buffer: EditBuffer,
        flash: Flash,
    },
}

/// The detail panel state machine: `Closed` ⇄ `Open`, with the open state
/// cycling Idle → Saving → Success/Error through a save attempt.
#[derive(Debug, Clone, Default)]
pub struct DetailController {
    state: State,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    pub fn open_id(&self) -> Option<&str> {
        match &self.state {
            State::Open { id, .. } => Some(id),
            State::Closed => None,
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            State::Open { buffer, .. } => Some(buffer),
            State::Closed => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match &mut self.state {
            State::Open { buffer, .. } => Some(buffer),
            State::Closed => None,
        }
    }

    pub fn flash(&self) -> Option<&Flash> {
        match &self.state {
            State::Open { flash, .. } => Some(flash),
            State::Closed => None,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.flash().is_some_and(Flash::is_saving)
    }

    /// Open the detail view for `id`, seeding the buffer from the replica.
    /// Opening an id absent from the replica is a no-op and returns false.
    pub fn open(&mut self, tickets: &[Ticket], id: &str) -> bool {
        let Some(ticket) = tickets.iter().find(|t| t.id == id) else {
            return false;
        };
        self.state = State::Open {
            id: ticket.id.clone(),
            buffer: EditBuffer::seed(ticket),
            flash: Flash::idle(),
        };
        true
    }

    /// Close unconditionally, discarding the buffer.
    pub fn close(&mut self) {
        self.state = State::Closed;
    }

    /// Mark a save attempt as in flight.
    pub fn begin_save(&mut self) {
        if let State::Open { flash, .. } = &mut self.state {
            *flash = Flash::saving();
        }
    }

    /// Report a confirmed save. Only meaningful after the post-save refetch
    /// has landed, so the visible replica is never stale relative to the
    /// mutation the user just applied.
    pub fn save_succeeded(&mut self) {
        if let State::Open { flash, .. } = &mut self.state {
            *flash = Flash::success("Changes saved");
        }
    }

    /// Report a failed save; the buffer is left intact for retry.
    pub fn save_failed(&mut self, message: impl Into<String>) {
        if let State::Open { flash, .. } = &mut self.state {
            *flash = Flash::error(message);
        }
    }

    /// Re-derive the open buffer from freshly fetched data.
    ///
    /// While a save is in flight the buffer is left alone. When the open id
    /// no longer exists upstream the selection auto-closes and the caller is
    /// told which id vanished so it can explain why the panel went away.
    pub fn reconcile(&mut self, tickets: &[Ticket]) -> ReconcileOutcome {
        let State::Open { id, buffer, flash } = &mut self.state else {
            return ReconcileOutcome::Untouched;
        };
        if flash.is_saving() {
            return ReconcileOutcome::Untouched;
        }
        match tickets.iter().find(|t| &t.id == id) {
            Some(fresh) => {
                *buffer = EditBuffer::seed(fresh);
                ReconcileOutcome::Reseeded
            }
            None => {
                let missing = id.clone();
                self.state = State::Closed;
                ReconcileOutcome::ClosedMissing { id: missing }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_open_seeds_buffer_from_replica() {
        let mut tickets = vec![make_ticket("t-1", "open")];
        tickets[0].assignee = Some("sam".to_string());
        tickets[0].resolution_notes = Some("wip notes".to_string());

        let mut detail = DetailController::new();
        assert!(detail.open(&tickets, "t-1"));

        let buffer = detail.buffer().unwrap();
        assert_eq!(buffer.status, "open");
        assert_eq!(buffer.assignee, "sam");
        assert_eq!(buffer.resolution_notes, "wip notes");
        assert_eq!(detail.flash().unwrap().kind, FlashKind::Idle);
    }

    #[test]
    fn test_open_unknown_id_is_noop() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        assert!(!detail.open(&tickets, "t-9"));
        assert!(!detail.is_open());
    }

    #[test]
    fn test_reopen_clears_prior_flash() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");
        detail.save_failed("boom");
        detail.open(&tickets, "t-1");
        assert_eq!(detail.flash().unwrap().kind, FlashKind::Idle);
    }

    #[test]
    fn test_save_cycle() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");

        detail.begin_save();
        assert!(detail.is_saving());

        detail.save_succeeded();
        assert_eq!(detail.flash().unwrap().kind, FlashKind::Success);
        assert_eq!(detail.flash().unwrap().text, "Changes saved");
    }

    #[test]
    fn test_save_failure_keeps_buffer() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");
        detail.buffer_mut().unwrap().resolution_notes = "half-typed".to_string();

        detail.begin_save();
        detail.save_failed("Unable to update ticket");

        assert_eq!(detail.flash().unwrap().kind, FlashKind::Error);
        assert_eq!(detail.buffer().unwrap().resolution_notes, "half-typed");
    }

    #[test]
    fn test_reconcile_reseeds_when_not_saving() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");
        detail.buffer_mut().unwrap().status = "in_progress".to_string();

        let mut fresh = vec![make_ticket("t-1", "waiting_for_customer")];
        fresh[0].assignee = Some("lee".to_string());

        assert_eq!(detail.reconcile(&fresh), ReconcileOutcome::Reseeded);
        let buffer = detail.buffer().unwrap();
        assert_eq!(buffer.status, "waiting_for_customer");
        assert_eq!(buffer.assignee, "lee");
    }

    #[test]
    fn test_reconcile_skips_while_saving() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");
        detail.buffer_mut().unwrap().resolution_notes = "mid-edit".to_string();
        detail.begin_save();

        let fresh = vec![make_ticket("t-1", "resolved")];
        assert_eq!(detail.reconcile(&fresh), ReconcileOutcome::Untouched);
        assert_eq!(detail.buffer().unwrap().resolution_notes, "mid-edit");
        assert_eq!(detail.buffer().unwrap().status, "open");
    }

    #[test]
    fn test_reconcile_closes_when_ticket_vanishes() {
        let tickets = vec![make_ticket("t-1", "open")];
        let mut detail = DetailController::new();
        detail.open(&tickets, "t-1");

        let outcome = detail.reconcile(&[make_ticket("t-2", "open")]);
        assert_eq!(
            outcome,
            ReconcileOutcome::ClosedMissing {
                id: "t-1".to_string()
            }
        );
        assert!(!detail.is_open());
    }

    #[test]
    fn test_reconcile_without_selection_is_untouched() {
        let mut detail = DetailController::new();
        assert_eq!(
            detail.reconcile(&[make_ticket("t-1", "open")]),
            ReconcileOutcome::Untouched
        );
    }

    #[test]
    fn test_buffer_to_patch_omits_empty_fields() {
        let buffer = EditBuffer {
            status: "in_progress".to_string(),
            assignee: String::new(),
            resolution_notes: "  ".to_string(),
        };
        let patch = buffer.to_patch();
        assert_eq!(patch.status.as_deref(), Some("in_progress"));
        assert_eq!(patch.assignee, None);
        assert_eq!(patch.resolution_notes, None);
    }

    #[test]
    fn test_resolve_patch_uses_canned_note_only_when_empty() {
        let empty_notes = EditBuffer {
            status: "open".to_string(),
            assignee: String::new(),
            resolution_notes: String::new(),
        };
        let patch = empty_notes.to_resolve_patch();
        assert_eq!(patch.status.as_deref(), Some("resolved"));
        assert_eq!(patch.resolution_notes.as_deref(), Some(RESOLVED_VIA_DASHBOARD));

        let typed_notes = EditBuffer {
            status: "open".to_string(),
            assignee: String::new(),
            resolution_notes: "Replaced the cable.".to_string(),
        };
        assert_eq!(
            typed_notes.to_resolve_patch().resolution_notes.as_deref(),
            Some("Replaced the cable.")
        );
    }
}
