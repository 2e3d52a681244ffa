//! Emote set reconciler — diff, lifecycle, state persistence.
//!
//! Brings a remote emote set in line with a declared `EmoteSetConfig`
//! through an `EmoteSetApi`, reporting problems as `Diagnostics`.

pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod reconciler;
pub mod state;
pub mod store;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use diff::{diff_lists, Diff};
pub use error::{BindingDirection, ErrorKind, ReconcileError};
pub use reconciler::{Reconciled, Reconciler};
pub use state::EmoteSetState;
pub use store::StateStore;
