//! Emote set types shared by the client and the reconciler.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A member of an emote set.
///
/// Equality and hashing cover both fields: a renamed emote is a different
/// element as far as membership diffing is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Emote {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Authoritative snapshot of an emote set as held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteSet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub emotes: Vec<Emote>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Emote>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Emote>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A field the host may send that carries no desired state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Ignored;

impl<'de> Deserialize<'de> for Ignored {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Ignored)
    }
}

/// Desired state of an emote set, as declared by the user.
///
/// The host echoes the computed `id` back in the desired state; it is
/// accepted and dropped, the local state record owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmoteSetConfig {
    pub name: String,
    #[serde(default)]
    pub emotes: Vec<Emote>,
    #[serde(default, rename = "id", skip_serializing)]
    computed_id: Ignored,
}

impl EmoteSetConfig {
    pub fn new(name: impl Into<String>, emotes: Vec<Emote>) -> Self {
        Self {
            name: name.into(),
            emotes,
            computed_id: Ignored,
        }
    }

    /// Parse and validate a desired state handed over by the host.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let config: EmoteSetConfig = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject blank set names, blank emote ids and repeated emote ids.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("name must not be empty".into()));
        }
        if let Some(pos) = self.emotes.iter().position(|e| e.id.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "emotes[{}].id must not be empty",
                pos
            )));
        }
        let dupes = self.duplicate_emote_ids();
        if !dupes.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "emote ids declared more than once: {}",
                dupes.join(", ")
            )));
        }
        Ok(())
    }

    /// Emote ids declared more than once, in first-repeat order.
    pub fn duplicate_emote_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes: Vec<String> = Vec::new();
        for emote in &self.emotes {
            if !seen.insert(emote.id.as_str()) && !dupes.contains(&emote.id) {
                dupes.push(emote.id.clone());
            }
        }
        dupes
    }
}
