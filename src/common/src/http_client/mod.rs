use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::event::envelope::TrackEnvelope;

/// Thin client for the vendor `/track/{token}` endpoint. Wraps a shared
/// `reqwest::Client`, so concurrent batches reuse one connection pool.
#[derive(Clone)]
pub struct TrackClient {
    http: Client,
    track_url: Url,
}

impl TrackClient {
    pub fn new(http: Client, track_url: Url) -> Self {
        TrackClient { http, track_url }
    }

    pub fn track_url(&self) -> &Url {
        &self.track_url
    }

    /// Sends one envelope. Returns the response status and body; transport
    /// failures (including timeouts) surface as `reqwest::Error` so the
    /// caller can tell them apart.
    pub async fn deliver(
        &self,
        envelope: &TrackEnvelope,
        timeout: Duration,
    ) -> Result<(u16, String), reqwest::Error> {
        let response = self
            .http
            .post(self.track_url.clone())
            .header("Content-Type", "application/json")
            .json(envelope)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        debug!("delivered `{}` envelope, status {}", envelope.event, status);
        Ok((status, body))
    }
}
