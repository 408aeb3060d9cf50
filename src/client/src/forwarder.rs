use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use relay_common::event::envelope::TrackEnvelope;
use relay_common::event::Event;
use relay_common::http_client::TrackClient;

use crate::config_manager::Config;
use crate::destination::{AccountSettings, ConfigError, DestinationConfig};
use crate::outcome::{BatchResponse, EventOutcome, FailureReason};

/// Forwards batches of host events to the vendor ingestion endpoint.
///
/// Holds no per-destination state: destination settings are resolved fresh on
/// every call, so a single forwarder serves any number of concurrent batches
/// for different destinations. Only the underlying HTTP connection pool is
/// shared, and `reqwest::Client` is safe for concurrent use.
pub struct Forwarder {
    config: Config,
    http: Client,
}

impl Forwarder {
    pub fn new(config: Config) -> Self {
        Forwarder {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Delivers every event in `events` to the destination described by
    /// `settings`.
    ///
    /// Returns exactly one outcome per input event, in input order. A failure
    /// on one event never short-circuits its siblings; only invalid
    /// destination settings abort the call, and they do so before any network
    /// activity. No retries happen here — retrying failed events is the
    /// caller's call.
    pub async fn process_batch(
        &self,
        events: Vec<Event>,
        settings: &AccountSettings,
    ) -> Result<BatchResponse, ConfigError> {
        self.process_batch_with_cancel(events, settings, &CancellationToken::new())
            .await
    }

    /// Like [`Forwarder::process_batch`], but stops early once `cancel`
    /// fires: events already delivered keep their outcome (delivery is not
    /// transactional), everything still pending is reported as
    /// `Failed(Cancelled)`.
    pub async fn process_batch_with_cancel(
        &self,
        events: Vec<Event>,
        settings: &AccountSettings,
        cancel: &CancellationToken,
    ) -> Result<BatchResponse, ConfigError> {
        let destination = DestinationConfig::resolve(settings)?;

        if events.is_empty() {
            debug!("empty batch for `{}`, nothing to deliver", destination.hostname);
            return Ok(BatchResponse::empty());
        }

        let track_url = destination.track_url(&self.config)?;
        let client = TrackClient::new(self.http.clone(), track_url);
        let timeout = Duration::from_millis(self.config.delivery_timeout_ms);
        let limiter = Arc::new(Semaphore::new(self.config.max_in_flight));

        debug!(
            "delivering {} events to `{}`",
            events.len(),
            destination.hostname
        );

        // join_all keeps results in input order regardless of completion order
        let deliveries = events.iter().map(|event| {
            let client = &client;
            let limiter = Arc::clone(&limiter);
            async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => EventOutcome::Failed(FailureReason::Cancelled),
                    outcome = Self::deliver_one(client, event, timeout, limiter) => outcome,
                }
            }
        });
        let outcomes = future::join_all(deliveries).await;

        let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
        if failed > 0 {
            warn!(
                "{failed} of {} events failed delivery to `{}`",
                outcomes.len(),
                destination.hostname
            );
        }

        Ok(BatchResponse::new(outcomes))
    }

    async fn deliver_one(
        client: &TrackClient,
        event: &Event,
        timeout: Duration,
        limiter: Arc<Semaphore>,
    ) -> EventOutcome {
        let envelope = match TrackEnvelope::from_event(event) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("dropping event {}: {err}", event.id);
                return EventOutcome::Failed(FailureReason::UnsupportedEventKind { kind: err.0 });
            }
        };

        // acquire fails only on a closed semaphore, which cannot happen while
        // the batch owns it
        let _permit = match limiter.acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return EventOutcome::Failed(FailureReason::Cancelled),
        };

        match client.deliver(&envelope, timeout).await {
            Ok((status, _)) if (200..300).contains(&status) => EventOutcome::Delivered,
            Ok((status, body)) => {
                EventOutcome::Failed(FailureReason::RemoteRejection { status, body })
            }
            Err(err) if err.is_timeout() => EventOutcome::Failed(FailureReason::Timeout),
            Err(err) => EventOutcome::Failed(FailureReason::Transport {
                message: err.to_string(),
            }),
        }
    }
}
