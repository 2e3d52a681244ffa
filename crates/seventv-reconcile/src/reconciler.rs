//! Reconciler — drives create/read/update/delete of one emote set.
//!
//! Every entry point takes the current local state record by value and
//! returns the new record together with diagnostics. Remote calls are issued
//! one at a time in a fixed order; the first failure ends the operation.
//!
//! Known limitation: a failure while adding or removing bindings during
//! `update` leaves the remote ahead of the returned record. Nothing is rolled
//! back; a subsequent `read` is the recovery path.

use seventv_api::EmoteSetApi;
use seventv_core::{Emote, EmoteSetConfig};
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::diff::diff_lists;
use crate::error::{BindingDirection, ReconcileError};
use crate::state::EmoteSetState;

/// Outcome of a lifecycle call.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub state: EmoteSetState,
    pub diagnostics: Diagnostics,
}

impl Reconciled {
    fn ok(state: EmoteSetState) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }

    fn failed(state: EmoteSetState, err: ReconcileError) -> Self {
        warn!("{}", err);
        Self {
            state,
            diagnostics: err.into(),
        }
    }

    /// True when no error diagnostic was produced.
    pub fn is_ok(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Lifecycle engine for emote sets backed by an `EmoteSetApi`.
pub struct Reconciler<C> {
    client: C,
}

impl<C: EmoteSetApi> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Create the remote set, then read back its membership.
    ///
    /// Declared emotes are not bound here: a new set starts empty and the
    /// next `update` brings membership in line.
    pub async fn create(&self, state: EmoteSetState, desired: &EmoteSetConfig) -> Reconciled {
        if let Err(e) = desired.validate() {
            return Reconciled::failed(state, ReconcileError::InvalidConfig(e));
        }
        if let Some(id) = state.id() {
            let id = id.to_string();
            return Reconciled::failed(state, ReconcileError::AlreadyCreated { id });
        }

        let id = match self.client.create_emote_set(&desired.name).await {
            Ok(id) => id,
            Err(e) => return Reconciled::failed(state, ReconcileError::Create(e)),
        };
        info!("Created emote set {} ({})", id, desired.name);

        if !desired.emotes.is_empty() {
            warn!(
                "Emote set {}: {} declared emotes are not bound at creation",
                id,
                desired.emotes.len()
            );
        }

        let created = EmoteSetState {
            id: Some(id),
            name: desired.name.clone(),
            emotes: Vec::new(),
            synced_at: None,
        };
        self.read(created).await
    }

    /// Replace local membership with the remote's.
    pub async fn read(&self, mut state: EmoteSetState) -> Reconciled {
        match self.refresh(&mut state).await {
            Ok(()) => Reconciled::ok(state),
            Err(e) => Reconciled::failed(state, e),
        }
    }

    /// Move the remote set from the recorded membership to `desired`.
    ///
    /// `state.emotes` is the prior membership the diff runs against.
    pub async fn update(&self, mut state: EmoteSetState, desired: &EmoteSetConfig) -> Reconciled {
        if let Err(e) = desired.validate() {
            return Reconciled::failed(state, ReconcileError::InvalidConfig(e));
        }
        let id = match state.id() {
            Some(id) => id.to_string(),
            None => {
                return Reconciled::failed(state, ReconcileError::MissingId { operation: "update" })
            }
        };

        if state.emotes == desired.emotes {
            if state.name != desired.name {
                if let Err(e) = self.rename(&id, &desired.name).await {
                    return Reconciled::failed(state, e);
                }
                state.name = desired.name.clone();
            }
            return self.read(state).await;
        }

        if let Err(e) = self.rename(&id, &desired.name).await {
            return Reconciled::failed(state, e);
        }
        state.name = desired.name.clone();

        if let Err(e) = self.apply_membership(&id, &state.emotes, &desired.emotes).await {
            return Reconciled::failed(state, e);
        }

        self.read(state).await
    }

    /// Delete the remote set. The record is only cleared on success.
    pub async fn delete(&self, state: EmoteSetState) -> Reconciled {
        let id = match state.id() {
            Some(id) => id.to_string(),
            None => {
                return Reconciled::failed(state, ReconcileError::MissingId { operation: "delete" })
            }
        };

        if let Err(source) = self.client.delete_emote_set(&id).await {
            return Reconciled::failed(state, ReconcileError::Delete { id, source });
        }
        info!("Deleted emote set {}", id);

        Reconciled::ok(EmoteSetState::default())
    }

    /// Adopt an existing remote set knowing only its id.
    pub async fn import(&self, id: &str) -> Reconciled {
        let mut state = EmoteSetState::imported(id);
        if !state.is_created() {
            return Reconciled::failed(state, ReconcileError::MissingId { operation: "import" });
        }

        match self.client.get_emote_set(id).await {
            Ok(set) => {
                state.name = set.name.clone();
                state.apply_snapshot(set);
                info!("Imported emote set {} ({})", id, state.name);
                Reconciled::ok(state)
            }
            Err(source) => Reconciled::failed(state, ReconcileError::read(id, source)),
        }
    }

    async fn refresh(&self, state: &mut EmoteSetState) -> Result<(), ReconcileError> {
        let id = state
            .id()
            .ok_or(ReconcileError::MissingId { operation: "read" })?
            .to_string();

        let set = self
            .client
            .get_emote_set(&id)
            .await
            .map_err(|source| ReconcileError::read(&id, source))?;

        debug!("Read emote set {}: {} emotes", id, set.emotes.len());
        state.apply_snapshot(set);
        Ok(())
    }

    async fn rename(&self, id: &str, name: &str) -> Result<(), ReconcileError> {
        self.client
            .update_emote_set(id, name)
            .await
            .map_err(|source| ReconcileError::Update {
                id: id.to_string(),
                source,
            })?;
        debug!("Renamed emote set {} to {}", id, name);
        Ok(())
    }

    /// Remove deleted bindings in prior order, then add created ones in
    /// desired order. Retained emotes are left alone.
    async fn apply_membership(
        &self,
        id: &str,
        prior: &[Emote],
        desired: &[Emote],
    ) -> Result<(), ReconcileError> {
        let diff = diff_lists(prior, desired);
        info!(
            "Emote set {}: {} to remove, {} retained, {} to add",
            id,
            diff.deleted.len(),
            diff.retained.len(),
            diff.created.len()
        );
        if diff.is_empty() {
            return Ok(());
        }

        for emote in &diff.deleted {
            debug!("Removing emote {} from set {}", emote.id, id);
            self.client
                .delete_emote_binding(id, &emote.id)
                .await
                .map_err(|source| ReconcileError::Binding {
                    set_id: id.to_string(),
                    emote_id: emote.id.clone(),
                    direction: BindingDirection::Remove,
                    source,
                })?;
        }

        for emote in &diff.created {
            debug!("Adding emote {} as {:?} to set {}", emote.id, emote.name, id);
            let alias = Some(emote.name.as_str()).filter(|n| !n.is_empty());
            self.client
                .add_emote_to_set(id, &emote.id, alias)
                .await
                .map_err(|source| ReconcileError::Binding {
                    set_id: id.to_string(),
                    emote_id: emote.id.clone(),
                    direction: BindingDirection::Add,
                    source,
                })?;
        }

        Ok(())
    }
}
