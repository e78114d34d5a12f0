pub mod commands;
pub mod config;
pub mod detail;
pub mod engine;
pub mod error;
pub mod filter;
pub mod form;
pub mod remote;
pub mod render;
pub mod types;
pub mod vocab;
pub mod watch;

pub use config::{AuthConfig, DeskConfig};
pub use detail::{
    DetailController, EditBuffer, Flash, FlashKind, RESOLVED_VIA_DASHBOARD, ReconcileOutcome,
};
pub use engine::{
    Dashboard, create_and_refresh, patch_and_refresh, refresh_all, resolve_detail, resolve_ticket,
    save_detail,
};
pub use error::{DeskError, Result};
pub use filter::{FilterState, Selector, filter_tickets};
pub use form::{IntakeField, IntakeSections, TicketDraft, build_create_payload};
pub use remote::{HttpTicketClient, TicketApi};
pub use types::{CreateOutcome, NewTicket, StatsSnapshot, Ticket, TicketPatch, TotalStats};
pub use vocab::{VocabEntry, Vocabulary};
pub use watch::{WatchOptions, WatchView};
