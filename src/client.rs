//! Status Fetch Client
//!
//! A single unauthenticated GET against the status document, with a
//! cache-busting query parameter so intermediaries never serve a stale
//! body. No retries, no backoff; a failed fetch fails that cycle only.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;

use crate::error::UpdateError;
use crate::types::StatusSnapshot;

/// Resource path of the status document, relative to the base URL.
pub const STATUS_PATH: &str = "status.json";

/// Where a refresh cycle gets its snapshot from. The updater only sees
/// this trait, so tests can substitute a canned or failing source.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, UpdateError>;
}

/// HTTP-backed status source.
pub struct StatusClient {
    base_url: String,
    http: Client,
}

impl StatusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// Full request URL for one fetch, with the current time as the
    /// cache-busting parameter.
    fn status_url(&self) -> String {
        format!(
            "{}/{}?t={}",
            self.base_url.trim_end_matches('/'),
            STATUS_PATH,
            Utc::now().timestamp_millis()
        )
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, UpdateError> {
        let response = self
            .http
            .get(self.status_url())
            .send()
            .await?
            .error_for_status()?;

        // Deserialize from text rather than `.json()` so a malformed
        // body surfaces as a parse error, not a transport error.
        let body = response.text().await?;
        let snapshot: StatusSnapshot = serde_json::from_str(&body)?;
        Ok(snapshot)
    }
}
