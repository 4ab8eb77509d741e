//! Square connection status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Connection health snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareStatus {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_items: Option<bool>,
}

impl SquareStatus {
    /// Disconnected status carrying `message`.
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: Some(message.into()),
            error: None,
            last_sync: None,
            environment: None,
            has_items: None,
        }
    }
}

impl Default for SquareStatus {
    fn default() -> Self {
        Self::disconnected("Not connected to Square")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        let status = SquareStatus::default();
        assert!(!status.connected);
        assert_eq!(status.message.as_deref(), Some("Not connected to Square"));
    }

    #[test]
    fn test_minimal_payload() {
        let status: SquareStatus = serde_json::from_str(r#"{"connected":true}"#).unwrap();
        assert!(status.connected);
        assert!(status.last_sync.is_none());
    }

    #[test]
    fn test_camel_case() {
        let json = r#"{"connected":true,"hasItems":true,"lastSync":"2024-01-01T00:00:00Z"}"#;
        let status: SquareStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.has_items, Some(true));
        assert!(status.last_sync.is_some());
    }
}
