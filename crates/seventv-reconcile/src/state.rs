//! Local state record: the controller's last-synchronized view of one set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seventv_core::{Emote, EmoteSet};

/// Last known remote state of a managed emote set.
///
/// Passed by value into every lifecycle call and handed back afterwards.
/// `emotes` only ever holds what the remote service last returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteSetState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emotes: Vec<Emote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl EmoteSetState {
    /// A record that knows only the remote id, for adoption via import.
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Remote id, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_created(&self) -> bool {
        self.id().is_some()
    }

    /// Replace membership with a fresh remote snapshot.
    pub(crate) fn apply_snapshot(&mut self, set: EmoteSet) {
        self.emotes = set.emotes;
        self.synced_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_absent() {
        let state = EmoteSetState::default();
        assert!(!state.is_created());
        assert_eq!(state.id(), None);
    }

    #[test]
    fn test_empty_id_is_absent() {
        let state = EmoteSetState {
            id: Some(String::new()),
            ..Default::default()
        };
        assert!(!state.is_created());
    }

    #[test]
    fn test_apply_snapshot_replaces() {
        let mut state = EmoteSetState {
            id: Some("abc".into()),
            name: "pog".into(),
            emotes: vec![Emote::new("stale", "x")],
            synced_at: None,
        };
        state.apply_snapshot(EmoteSet {
            id: "abc".into(),
            name: "renamed elsewhere".into(),
            emotes: vec![Emote::new("1", "a")],
        });
        assert_eq!(state.emotes, vec![Emote::new("1", "a")]);
        assert_eq!(state.name, "pog");
        assert!(state.synced_at.is_some());
    }

    #[test]
    fn test_serde_roundtrip_absent_fields() {
        let state: EmoteSetState = serde_json::from_str(r#"{"name": "pog"}"#).unwrap();
        assert!(!state.is_created());
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("synced_at").is_none());
    }
}
