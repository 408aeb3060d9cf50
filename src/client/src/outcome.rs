use serde::{Deserialize, Serialize};
use thiserror::Error;

use relay_common::event::Event;

use crate::destination::AccountSettings;

/// Why one event failed to reach the vendor. Always isolated to its event;
/// never aborts the rest of the batch.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("unsupported event kind `{kind}`")]
    UnsupportedEventKind { kind: String },
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("vendor rejected the event with status {status}")]
    RemoteRejection { status: u16, body: String },
    #[error("delivery timed out")]
    Timeout,
    #[error("batch was cancelled before this event was delivered")]
    Cancelled,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum EventOutcome {
    Delivered,
    Failed(FailureReason),
}

impl EventOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, EventOutcome::Delivered)
    }
}

/// Aggregate result of one batch: exactly one outcome per input event, in
/// input order. The forwarder hands it to the caller and keeps nothing.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BatchResponse {
    pub outcomes: Vec<EventOutcome>,
}

impl BatchResponse {
    pub fn new(outcomes: Vec<EventOutcome>) -> Self {
        BatchResponse { outcomes }
    }

    pub fn empty() -> Self {
        BatchResponse::default()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.delivered()
    }

    pub fn is_fully_delivered(&self) -> bool {
        self.outcomes.iter().all(EventOutcome::is_delivered)
    }
}

/// Inbound batch shape from the host: the ordered events plus the account
/// settings they should be delivered with.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub events: Vec<Event>,
    pub account: AccountSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_counts_as_fully_delivered() {
        let response = BatchResponse::empty();
        assert!(response.is_empty());
        assert!(response.is_fully_delivered());
    }

    #[test]
    fn aggregates_reflect_per_event_outcomes() {
        let response = BatchResponse::new(vec![
            EventOutcome::Delivered,
            EventOutcome::Failed(FailureReason::Timeout),
            EventOutcome::Delivered,
        ]);
        assert_eq!(response.len(), 3);
        assert_eq!(response.delivered(), 2);
        assert_eq!(response.failed(), 1);
        assert!(!response.is_fully_delivered());
    }

    #[test]
    fn outcomes_serialize_with_status_and_reason_tags() {
        let delivered = serde_json::to_value(EventOutcome::Delivered).unwrap();
        assert_eq!(delivered["status"], "delivered");

        let failed = serde_json::to_value(EventOutcome::Failed(FailureReason::RemoteRejection {
            status: 503,
            body: "try later".to_string(),
        }))
        .unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["failure"]["reason"], "remote_rejection");
        assert_eq!(failed["failure"]["status"], 503);
        assert_eq!(failed["failure"]["body"], "try later");
    }
}
