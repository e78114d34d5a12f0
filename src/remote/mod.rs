//! Remote ticket service access.
//!
//! This module provides the contract the dashboard engine needs from the
//! backend (exactly four operations) plus the HTTP implementation of it.
//! Keeping the contract behind a trait lets the engine and its tests run
//! against scripted in-memory implementations.

pub mod client;

pub use client::HttpTicketClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreateOutcome, NewTicket, StatsSnapshot, Ticket, TicketPatch};

/// The backend operations the dashboard engine consumes.
///
/// Every operation is a single round trip. Implementations report failures
/// through the error channel and never panic on malformed payloads; they do
/// not retry or pace themselves; callers own both.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Fetch the full ticket collection.
    async fn list_tickets(&self) -> Result<Vec<Ticket>>;

    /// Fetch the aggregate stats snapshot.
    async fn fetch_stats(&self) -> Result<StatsSnapshot>;

    /// Submit a new ticket.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreateOutcome>;

    /// Apply a partial update to one ticket.
    async fn patch_ticket(&self, id: &str, patch: &TicketPatch) -> Result<()>;
}
