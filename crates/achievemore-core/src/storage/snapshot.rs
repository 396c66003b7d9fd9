//! The persisted state blob.
//!
//! One JSON document holds everything that survives a restart. Keys are
//! camelCase; instants are RFC 3339 strings and habit days are `YYYY-MM-DD`.
//! Every field has a default so older or partial blobs still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::habit::Habit;
use crate::reminder::Reminder;
use crate::task::{Task, UserType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_profile_image: String,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// # Errors
    /// Returns [`PersistenceError::Malformed`] if `text` is not a snapshot.
    pub fn decode(text: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(text).map_err(PersistenceError::Malformed)
    }

    /// # Errors
    /// Returns [`PersistenceError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_decodes_to_default() {
        let snap = Snapshot::decode("{}").unwrap();
        assert_eq!(snap, Snapshot::default());
    }

    #[test]
    fn null_user_type_is_accepted() {
        let snap = Snapshot::decode(r#"{"userType": null, "userName": "Ada"}"#).unwrap();
        assert_eq!(snap.user_type, None);
        assert_eq!(snap.user_name, "Ada");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Snapshot::decode("{\"tasks\": [").unwrap_err();
        assert!(matches!(err, PersistenceError::Malformed(_)));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let text = r#"{"tasks": [{
            "id": "6f1c3a6e-2f0e-4c39-9d8a-3f8e4e0f1a11",
            "title": "x", "category": "work", "priority": "low",
            "duration": 10, "dueDate": "not a date"
        }]}"#;
        assert!(matches!(
            Snapshot::decode(text),
            Err(PersistenceError::Malformed(_))
        ));
    }
}
