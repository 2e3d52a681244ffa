//! Remote client contract for emote set resources.

use std::future::Future;
use std::sync::Arc;

use seventv_core::{EmoteSet, Result};

/// Operations the backing service exposes for emote sets and their bindings.
///
/// Implementations own retries and timeouts. An unknown set id must surface
/// as `Error::NotFound` so callers can tell a vanished resource apart from a
/// transport failure.
pub trait EmoteSetApi: Send + Sync {
    /// Create an empty, named emote set. Returns the remote-assigned id.
    fn create_emote_set(&self, name: &str) -> impl Future<Output = Result<String>> + Send;

    /// Fetch the full, authoritative snapshot of an emote set.
    fn get_emote_set(&self, id: &str) -> impl Future<Output = Result<EmoteSet>> + Send;

    /// Rename an emote set.
    fn update_emote_set(&self, id: &str, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Delete an emote set together with all of its bindings.
    fn delete_emote_set(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Bind an emote into a set, optionally under an alias.
    fn add_emote_to_set(
        &self,
        set_id: &str,
        emote_id: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove an emote binding from a set.
    fn delete_emote_binding(
        &self,
        set_id: &str,
        emote_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<T: EmoteSetApi> EmoteSetApi for Arc<T> {
    fn create_emote_set(&self, name: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).create_emote_set(name)
    }

    fn get_emote_set(&self, id: &str) -> impl Future<Output = Result<EmoteSet>> + Send {
        (**self).get_emote_set(id)
    }

    fn update_emote_set(&self, id: &str, name: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).update_emote_set(id, name)
    }

    fn delete_emote_set(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_emote_set(id)
    }

    fn add_emote_to_set(
        &self,
        set_id: &str,
        emote_id: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).add_emote_to_set(set_id, emote_id, name)
    }

    fn delete_emote_binding(
        &self,
        set_id: &str,
        emote_id: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_emote_binding(set_id, emote_id)
    }
}

impl<T: EmoteSetApi> EmoteSetApi for &T {
    fn create_emote_set(&self, name: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).create_emote_set(name)
    }

    fn get_emote_set(&self, id: &str) -> impl Future<Output = Result<EmoteSet>> + Send {
        (**self).get_emote_set(id)
    }

    fn update_emote_set(&self, id: &str, name: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).update_emote_set(id, name)
    }

    fn delete_emote_set(&self, id: &str) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_emote_set(id)
    }

    fn add_emote_to_set(
        &self,
        set_id: &str,
        emote_id: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).add_emote_to_set(set_id, emote_id, name)
    }

    fn delete_emote_binding(
        &self,
        set_id: &str,
        emote_id: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).delete_emote_binding(set_id, emote_id)
    }
}
