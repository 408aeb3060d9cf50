use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod envelope;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEnvironment {
    Android,
    Ios,
    Unknown,
}

impl std::fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeEnvironment::Android => write!(f, "android"),
            RuntimeEnvironment::Ios => write!(f, "ios"),
            RuntimeEnvironment::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identity namespaces the platform may attach to an event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Email,
    CustomerId,
    Facebook,
    Google,
    Microsoft,
    Twitter,
    Yahoo,
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub kind: IdentityKind,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    Foreground,
    Background,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PushSubscriptionAction {
    Subscribe,
    Unsubscribe,
}

/// Kind-specific payload of one event. The tag mirrors the event-type names
/// the host platform emits; anything it sends that we do not recognize lands
/// in `Unknown` and is rejected at translation rather than at parse time, so
/// a single odd event cannot poison a whole batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventData {
    ApplicationStateTransition {
        state: ApplicationState,
    },
    Custom {
        name: String,
        #[serde(default)]
        attributes: Map<String, Value>,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stack_trace: Option<String>,
    },
    PrivacySettingChange {
        setting: String,
        enabled: bool,
    },
    PushMessageReceipt {
        payload: String,
    },
    PushSubscription {
        action: PushSubscriptionAction,
        push_token: String,
    },
    ScreenView {
        screen_name: String,
        #[serde(default)]
        attributes: Map<String, Value>,
    },
    SessionStart,
    SessionEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_length_ms: Option<u64>,
    },
    UserAttributeChange {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_value: Option<Value>,
    },
    UserIdentityChange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new: Option<UserIdentity>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old: Option<UserIdentity>,
    },
    #[serde(other)]
    Unknown,
}

impl EventData {
    pub fn kind(&self) -> &'static str {
        match self {
            EventData::ApplicationStateTransition { .. } => "application_state_transition",
            EventData::Custom { .. } => "custom",
            EventData::Error { .. } => "error",
            EventData::PrivacySettingChange { .. } => "privacy_setting_change",
            EventData::PushMessageReceipt { .. } => "push_message_receipt",
            EventData::PushSubscription { .. } => "push_subscription",
            EventData::ScreenView { .. } => "screen_view",
            EventData::SessionStart => "session_start",
            EventData::SessionEnd { .. } => "session_end",
            EventData::UserAttributeChange { .. } => "user_attribute_change",
            EventData::UserIdentityChange { .. } => "user_identity_change",
            EventData::Unknown => "unknown",
        }
    }
}

/// One normalized user/app activity record as handed over by the host.
/// Immutable once received; the forwarder borrows it for a single delivery
/// attempt and never retains it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    #[serde(with = "ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub environment: RuntimeEnvironment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_identities: Vec<UserIdentity>,
    #[serde(flatten)]
    pub data: EventData,
}

impl Event {
    /// New event stamped with the current time and a fresh id.
    pub fn now(environment: RuntimeEnvironment, data: EventData) -> Self {
        Event {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            environment,
            device_id: None,
            session_id: None,
            user_identities: Vec::new(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_event_round_trips_through_json() {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::from("purchase"));
        let event = Event::now(
            RuntimeEnvironment::Ios,
            EventData::Custom {
                name: "purchase".to_string(),
                attributes,
            },
        );

        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();

        // timestamps travel as whole seconds
        assert_eq!(parsed.timestamp.timestamp(), event.timestamp.timestamp());
        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.data, event.data);
        assert_eq!(parsed.environment, event.environment);
    }

    #[test]
    fn unrecognized_event_type_parses_as_unknown() {
        let json = serde_json::json!({
            "id": "7f8a024e-9452-4d41-8ba4-40fc3f2915f3",
            "timestamp": 1_700_000_000,
            "environment": "android",
            "event_type": "commerce_product_action",
            "products": ["sku-1"],
        });

        let event: Event = serde_json::from_value(json).unwrap();
        assert_eq!(event.data, EventData::Unknown);
    }

    #[test]
    fn event_type_tag_matches_kind() {
        let event = Event::now(RuntimeEnvironment::Android, EventData::SessionStart);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "session_start");
        assert_eq!(event.data.kind(), "session_start");
    }
}
