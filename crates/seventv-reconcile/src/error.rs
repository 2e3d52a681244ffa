//! Lifecycle error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which way a membership binding was being changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingDirection {
    Add,
    Remove,
}

impl std::fmt::Display for BindingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingDirection::Add => write!(f, "add"),
            BindingDirection::Remove => write!(f, "remove"),
        }
    }
}

/// Discriminant of a `ReconcileError`, carried on diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Create,
    Read,
    NotFound,
    Update,
    Binding,
    Delete,
    MissingId,
    AlreadyCreated,
    InvalidConfig,
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to create emote set: {0}")]
    Create(#[source] seventv_core::Error),

    #[error("Failed to read emote set {id}: {source}")]
    Read {
        id: String,
        source: seventv_core::Error,
    },

    #[error("Emote set {id} no longer exists")]
    NotFound {
        id: String,
        source: seventv_core::Error,
    },

    #[error("Failed to rename emote set {id}: {source}")]
    Update {
        id: String,
        source: seventv_core::Error,
    },

    #[error("Failed to {direction} emote {emote_id} in set {set_id}: {source}")]
    Binding {
        set_id: String,
        emote_id: String,
        direction: BindingDirection,
        source: seventv_core::Error,
    },

    #[error("Failed to delete emote set {id}: {source}")]
    Delete {
        id: String,
        source: seventv_core::Error,
    },

    #[error("Cannot {operation} an emote set without an id")]
    MissingId { operation: &'static str },

    #[error("Emote set {id} already exists")]
    AlreadyCreated { id: String },

    #[error(transparent)]
    InvalidConfig(seventv_core::Error),
}

impl ReconcileError {
    /// Classify a failed fetch: unknown ids become `NotFound`.
    pub fn read(id: &str, source: seventv_core::Error) -> Self {
        if source.is_not_found() {
            ReconcileError::NotFound {
                id: id.to_string(),
                source,
            }
        } else {
            ReconcileError::Read {
                id: id.to_string(),
                source,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::Create(_) => ErrorKind::Create,
            ReconcileError::Read { .. } => ErrorKind::Read,
            ReconcileError::NotFound { .. } => ErrorKind::NotFound,
            ReconcileError::Update { .. } => ErrorKind::Update,
            ReconcileError::Binding { .. } => ErrorKind::Binding,
            ReconcileError::Delete { .. } => ErrorKind::Delete,
            ReconcileError::MissingId { .. } => ErrorKind::MissingId,
            ReconcileError::AlreadyCreated { .. } => ErrorKind::AlreadyCreated,
            ReconcileError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// True for failures that can leave the remote ahead of local state.
    pub fn is_partial_apply(&self) -> bool {
        matches!(self, ReconcileError::Binding { .. })
    }
}
