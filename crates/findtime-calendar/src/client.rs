//! HTTP client for the availability (`/findtime`) endpoint.

use tracing::instrument;

use crate::coordinator::EventFetcher;
use crate::error::CalendarError;
use crate::types::{Event, RangeInfo};

pub const DEFAULT_ENDPOINT_PATH: &str = "/findtime";

pub struct FindTimeClient {
    client: reqwest::Client,
    base_url: String,
    endpoint_path: String,
}

impl FindTimeClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Build on an existing `reqwest::Client` (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
        }
    }

    /// Override the endpoint path (default `/findtime`).
    pub fn with_endpoint_path(mut self, path: &str) -> Self {
        self.endpoint_path = path.to_string();
        self
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint_path)
    }

    /// Fetch busy blocks for `key` over `range`.
    ///
    /// RFC 3339 bounds are sent as given, bare dates as midnight UTC.
    /// One attempt, no retry.
    #[instrument(skip(self), level = "info")]
    pub async fn find_time(
        &self,
        key: &str,
        range: &RangeInfo,
    ) -> Result<Vec<Event>, CalendarError> {
        let (start, end) = range.wire_bounds()?;

        let response = self
            .client
            .get(self.endpoint_url())
            .query(&[("q", key), ("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<Event>, CalendarError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Event endpoint returned {}", status);
            return Err(CalendarError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CalendarError::Parse(e.to_string()))
    }
}

impl EventFetcher for FindTimeClient {
    type Event = Event;

    async fn fetch(&self, key: &str, range: &RangeInfo) -> Result<Vec<Event>, CalendarError> {
        self.find_time(key, range).await
    }
}
