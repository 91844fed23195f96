//! Change reports handed to callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A file observed to have changed during a poll tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    /// Path relative to the watch root.
    pub path: String,
    /// Wall-clock time the change was noticed.
    pub detected_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create an event stamped with the current time.
    pub fn new(path: impl Into<String>) -> Self {
        Self::at(path, Utc::now())
    }

    /// Create an event with an explicit timestamp.
    pub fn at(path: impl Into<String>, detected_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            detected_at,
        }
    }

    /// Render as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_json_line() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let event = ChangeEvent::at("src/main.rs", when);
        assert_eq!(
            event.to_json_line().unwrap(),
            r#"{"path":"src/main.rs","detected_at":"2024-05-01T12:30:00Z"}"#
        );
    }

    #[test]
    fn test_new_uses_current_time() {
        let before = Utc::now();
        let event = ChangeEvent::new("a.txt");
        assert_eq!(event.path, "a.txt");
        assert!(event.detected_at >= before);
    }
}
