//! In-process `EmoteSetApi` with a call journal and failure injection.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use seventv_core::{Emote, EmoteSet, Error, Result};
use tracing::debug;

use crate::client::EmoteSetApi;

/// Remote operation kind, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    CreateEmoteSet,
    GetEmoteSet,
    UpdateEmoteSet,
    DeleteEmoteSet,
    AddEmoteToSet,
    DeleteEmoteBinding,
}

/// One recorded remote call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateEmoteSet { name: String },
    GetEmoteSet { id: String },
    UpdateEmoteSet { id: String, name: String },
    DeleteEmoteSet { id: String },
    AddEmoteToSet { set_id: String, emote_id: String, name: Option<String> },
    DeleteEmoteBinding { set_id: String, emote_id: String },
}

impl ApiCall {
    pub fn operation(&self) -> ApiOperation {
        match self {
            ApiCall::CreateEmoteSet { .. } => ApiOperation::CreateEmoteSet,
            ApiCall::GetEmoteSet { .. } => ApiOperation::GetEmoteSet,
            ApiCall::UpdateEmoteSet { .. } => ApiOperation::UpdateEmoteSet,
            ApiCall::DeleteEmoteSet { .. } => ApiOperation::DeleteEmoteSet,
            ApiCall::AddEmoteToSet { .. } => ApiOperation::AddEmoteToSet,
            ApiCall::DeleteEmoteBinding { .. } => ApiOperation::DeleteEmoteBinding,
        }
    }

    /// Emote id targeted by a binding call.
    pub fn emote_id(&self) -> Option<&str> {
        match self {
            ApiCall::AddEmoteToSet { emote_id, .. } | ApiCall::DeleteEmoteBinding { emote_id, .. } => {
                Some(emote_id.as_str())
            }
            _ => None,
        }
    }
}

struct Failure {
    operation: ApiOperation,
    emote_id: Option<String>,
    message: String,
}

#[derive(Default)]
struct Inner {
    sets: HashMap<String, EmoteSet>,
    /// Default names of known emotes, applied when a binding has no alias.
    catalog: HashMap<String, String>,
    calls: Vec<ApiCall>,
    failures: Vec<Failure>,
    pending_ids: VecDeque<String>,
    next_id: u64,
}

impl Inner {
    /// Record the call, then fire the first matching one-shot failure.
    fn record(&mut self, call: ApiCall) -> Result<()> {
        let operation = call.operation();
        let emote_id = call.emote_id().map(str::to_string);
        debug!("MemoryApi: {:?}", call);
        self.calls.push(call);

        let hit = self.failures.iter().position(|f| {
            f.operation == operation
                && (f.emote_id.is_none() || f.emote_id == emote_id)
        });
        match hit {
            Some(pos) => {
                let failure = self.failures.remove(pos);
                Err(Error::Remote {
                    status: 500,
                    message: failure.message,
                })
            }
            None => Ok(()),
        }
    }

    fn set_mut(&mut self, id: &str) -> Result<&mut EmoteSet> {
        self.sets
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("emote set {}", id)))
    }
}

/// Emote set service held entirely in memory.
///
/// Clones share the same state, so a test can keep a handle while the
/// reconciler owns another.
#[derive(Clone, Default)]
pub struct MemoryApi {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the id handed out by the next `create_emote_set`.
    pub fn push_next_id(&self, id: impl Into<String>) {
        self.inner.lock().pending_ids.push_back(id.into());
    }

    /// Register an emote's own name, used when it is bound without an alias.
    pub fn register_emote(&self, id: impl Into<String>, name: impl Into<String>) {
        self.inner.lock().catalog.insert(id.into(), name.into());
    }

    /// Seed a remote set directly, bypassing the journal.
    pub fn insert_set(&self, set: EmoteSet) {
        self.inner.lock().sets.insert(set.id.clone(), set);
    }

    /// Current remote view of a set.
    pub fn set(&self, id: &str) -> Option<EmoteSet> {
        self.inner.lock().sets.get(id).cloned()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls of one kind.
    pub fn calls_of(&self, operation: ApiOperation) -> Vec<ApiCall> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Make the next call of `operation` fail.
    pub fn fail_on(&self, operation: ApiOperation, message: impl Into<String>) {
        self.inner.lock().failures.push(Failure {
            operation,
            emote_id: None,
            message: message.into(),
        });
    }

    /// Make the next binding call of `operation` for `emote_id` fail.
    pub fn fail_on_emote(
        &self,
        operation: ApiOperation,
        emote_id: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.inner.lock().failures.push(Failure {
            operation,
            emote_id: Some(emote_id.into()),
            message: message.into(),
        });
    }
}

impl EmoteSetApi for MemoryApi {
    async fn create_emote_set(&self, name: &str) -> Result<String> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::CreateEmoteSet { name: name.to_string() })?;

        let id = match inner.pending_ids.pop_front() {
            Some(id) => id,
            None => {
                inner.next_id += 1;
                format!("set-{}", inner.next_id)
            }
        };
        inner.sets.insert(
            id.clone(),
            EmoteSet {
                id: id.clone(),
                name: name.to_string(),
                emotes: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn get_emote_set(&self, id: &str) -> Result<EmoteSet> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::GetEmoteSet { id: id.to_string() })?;
        inner
            .sets
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("emote set {}", id)))
    }

    async fn update_emote_set(&self, id: &str, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::UpdateEmoteSet {
            id: id.to_string(),
            name: name.to_string(),
        })?;
        inner.set_mut(id)?.name = name.to_string();
        Ok(())
    }

    async fn delete_emote_set(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::DeleteEmoteSet { id: id.to_string() })?;
        inner
            .sets
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("emote set {}", id)))
    }

    async fn add_emote_to_set(&self, set_id: &str, emote_id: &str, name: Option<&str>) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::AddEmoteToSet {
            set_id: set_id.to_string(),
            emote_id: emote_id.to_string(),
            name: name.map(str::to_string),
        })?;

        let name = match name {
            Some(alias) => alias.to_string(),
            None => inner.catalog.get(emote_id).cloned().unwrap_or_default(),
        };
        let set = inner.set_mut(set_id)?;
        if set.emotes.iter().any(|e| e.id == emote_id) {
            return Err(Error::Remote {
                status: 409,
                message: format!("emote {} is already in set {}", emote_id, set_id),
            });
        }
        set.emotes.push(Emote::new(emote_id, name));
        Ok(())
    }

    async fn delete_emote_binding(&self, set_id: &str, emote_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.record(ApiCall::DeleteEmoteBinding {
            set_id: set_id.to_string(),
            emote_id: emote_id.to_string(),
        })?;

        let set = inner.set_mut(set_id)?;
        let before = set.emotes.len();
        set.emotes.retain(|e| e.id != emote_id);
        if set.emotes.len() == before {
            return Err(Error::NotFound(format!(
                "emote {} is not in set {}",
                emote_id, set_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let api = MemoryApi::new();
        api.push_next_id("abc");

        let id = api.create_emote_set("pog").await.unwrap();
        assert_eq!(id, "abc");

        let set = api.get_emote_set("abc").await.unwrap();
        assert_eq!(set.name, "pog");
        assert!(set.emotes.is_empty());

        let generated = api.create_emote_set("other").await.unwrap();
        assert_eq!(generated, "set-1");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let api = MemoryApi::new();
        let err = api.get_emote_set("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_bindings() {
        let api = MemoryApi::new();
        let id = api.create_emote_set("pog").await.unwrap();

        api.add_emote_to_set(&id, "1", Some("a")).await.unwrap();
        api.add_emote_to_set(&id, "2", None).await.unwrap();
        assert!(api.add_emote_to_set(&id, "1", Some("a")).await.is_err());

        api.delete_emote_binding(&id, "1").await.unwrap();
        assert!(api.delete_emote_binding(&id, "1").await.unwrap_err().is_not_found());

        assert_eq!(api.set(&id).unwrap().emotes, vec![Emote::new("2", "")]);
    }

    #[tokio::test]
    async fn test_unaliased_binding_uses_registered_name() {
        let api = MemoryApi::new();
        api.register_emote("1", "KEKW");
        let id = api.create_emote_set("pog").await.unwrap();

        api.add_emote_to_set(&id, "1", None).await.unwrap();
        api.add_emote_to_set(&id, "2", None).await.unwrap();
        assert_eq!(
            api.set(&id).unwrap().emotes,
            vec![Emote::new("1", "KEKW"), Emote::new("2", "")]
        );
    }

    #[tokio::test]
    async fn test_failure_is_one_shot_and_journaled() {
        let api = MemoryApi::new();
        api.fail_on(ApiOperation::CreateEmoteSet, "boom");

        assert!(api.create_emote_set("pog").await.is_err());
        assert!(api.create_emote_set("pog").await.is_ok());
        assert_eq!(api.calls_of(ApiOperation::CreateEmoteSet).len(), 2);
    }

    #[tokio::test]
    async fn test_failure_targets_emote() {
        let api = MemoryApi::new();
        let id = api.create_emote_set("pog").await.unwrap();
        api.fail_on_emote(ApiOperation::AddEmoteToSet, "2", "rejected");

        api.add_emote_to_set(&id, "1", Some("a")).await.unwrap();
        assert!(api.add_emote_to_set(&id, "2", Some("b")).await.is_err());
        assert_eq!(api.set(&id).unwrap().emotes.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let api = MemoryApi::new();
        let handle = api.clone();
        let id = api.create_emote_set("pog").await.unwrap();
        assert!(handle.set(&id).is_some());
        assert_eq!(handle.calls().len(), 1);

        handle.clear_calls();
        assert!(api.calls().is_empty());
    }
}
