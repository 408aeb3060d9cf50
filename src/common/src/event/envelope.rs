use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::event::{Event, EventData};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported event kind `{0}`")]
pub struct UnsupportedEventKind(pub String);

/// Vendor wire form of one event: `{"event": "<kind>", "properties": {...}}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrackEnvelope {
    pub event: String,
    pub properties: Map<String, Value>,
}

impl TrackEnvelope {
    /// Translates one event into the vendor envelope. Lossless for every
    /// recognized kind: all kind-specific attributes plus the common fields
    /// end up under `properties`, keyed exactly as they arrived.
    pub fn from_event(event: &Event) -> Result<TrackEnvelope, UnsupportedEventKind> {
        if matches!(event.data, EventData::Unknown) {
            return Err(UnsupportedEventKind(event.data.kind().to_string()));
        }

        let value = serde_json::to_value(event).expect("events serialize to JSON objects");
        let mut properties = match value {
            Value::Object(map) => map,
            _ => unreachable!("Event serializes as an object"),
        };
        // the kind tag moves to the envelope's `event` field
        properties.remove("event_type");

        Ok(TrackEnvelope {
            event: event.data.kind().to_string(),
            properties,
        })
    }
}
