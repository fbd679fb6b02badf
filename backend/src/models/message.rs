use serde::{Deserialize, Serialize};

use super::time::EpochMillis;

/// Prefix shared by every message key in the store.
pub const MESSAGE_KEY_PREFIX: &str = "message:";

/// A note left on one anniversary for the next.
///
/// Stored as a JSON text blob under its own `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastMessage {
    pub id: String,
    pub year_written: i32,
    pub message: String,
}

impl PastMessage {
    /// Store key for a message submitted at `submitted_at`.
    ///
    /// Two submissions in the same millisecond share a key; the later one wins.
    pub fn key_for(submitted_at: EpochMillis) -> String {
        format!("{}{}", MESSAGE_KEY_PREFIX, submitted_at.value())
    }

    pub fn from_json(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Submission payload before an id has been assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[serde(default)]
    pub year_written: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for() {
        assert_eq!(
            PastMessage::key_for(EpochMillis::new(1_716_575_400_000)),
            "message:1716575400000"
        );
    }

    #[test]
    fn test_stored_field_names() {
        let msg = PastMessage {
            id: "message:1".to_string(),
            year_written: 2024,
            message: "quack".to_string(),
        };
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"yearWritten\":2024"));
        assert!(json.contains("\"id\":\"message:1\""));
    }

    #[test]
    fn test_parses_stored_blob() {
        let msg =
            PastMessage::from_json(r#"{"id":"message:9","yearWritten":2023,"message":"hi"}"#)
                .unwrap();
        assert_eq!(msg.year_written, 2023);
        assert_eq!(msg.message, "hi");
    }

    #[test]
    fn test_rejects_blob_without_year() {
        assert!(PastMessage::from_json(r#"{"id":"message:9","message":"hi"}"#).is_err());
    }

    #[test]
    fn test_new_message_fields_optional() {
        let parsed: NewMessage = serde_json::from_str(r#"{"message":"x"}"#).unwrap();
        assert_eq!(parsed.year_written, None);
        assert_eq!(parsed.message.as_deref(), Some("x"));
    }
}
