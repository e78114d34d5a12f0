//! HTTP client for the ticket service.
//!
//! Paths and verbs mirror the service contract exactly: `GET /tickets`,
//! `GET /tickets/stats`, `POST /tickets`, `PATCH /tickets/{id}`. Non-2xx
//! responses surface the `detail` string from the body when one parses,
//! otherwise a per-operation fallback message. A 2xx response with an
//! unreadable body also degrades to the fallback rather than propagating a
//! decode error.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::{DeskError, Result};
use crate::types::{CreateOutcome, NewTicket, StatsSnapshot, Ticket, TicketPatch};

use super::TicketApi;

const LOAD_TICKETS_FALLBACK: &str = "Unable to load tickets";
const LOAD_STATS_FALLBACK: &str = "Unable to load stats";
const SUBMIT_FALLBACK: &str = "Submission failed";
const UPDATE_FALLBACK: &str = "Unable to update ticket";

/// Error body shape the service uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct HttpTicketClient {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl fmt::Debug for HttpTicketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTicketClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpTicketClient {
    /// Build a client against `base_url` (must carry a trailing slash so
    /// endpoint joins resolve inside it).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(30)))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Pass 2xx responses through; turn anything else into an API error
    /// carrying the service's `detail` when the body yields one.
    async fn check(response: Response, fallback: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.detail);
        tracing::debug!(status = %status, detail = ?detail, "service rejected request");
        Err(DeskError::Api(
            detail.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

#[async_trait]
impl TicketApi for HttpTicketClient {
    async fn list_tickets(&self) -> Result<Vec<Ticket>> {
        let request = self.authorize(self.client.get(self.endpoint("tickets")?));
        let response = Self::check(request.send().await?, LOAD_TICKETS_FALLBACK).await?;
        response.json().await.map_err(|err| {
            tracing::debug!(%err, "malformed ticket list payload");
            DeskError::Api(LOAD_TICKETS_FALLBACK.to_string())
        })
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot> {
        let request = self.authorize(self.client.get(self.endpoint("tickets/stats")?));
        let response = Self::check(request.send().await?, LOAD_STATS_FALLBACK).await?;
        response.json().await.map_err(|err| {
            tracing::debug!(%err, "malformed stats payload");
            DeskError::Api(LOAD_STATS_FALLBACK.to_string())
        })
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreateOutcome> {
        let request = self.authorize(self.client.post(self.endpoint("tickets")?).json(ticket));
        let response = Self::check(request.send().await?, SUBMIT_FALLBACK).await?;
        // A created ticket with an unreadable body still counts as created.
        Ok(response.json().await.unwrap_or_default())
    }

    async fn patch_ticket(&self, id: &str, patch: &TicketPatch) -> Result<()> {
        let request = self.authorize(
            self.client
                .patch(self.endpoint(&format!("tickets/{}", id))?)
                .json(patch),
        );
        Self::check(request.send().await?, UPDATE_FALLBACK).await?;
        Ok(())
    }
}
