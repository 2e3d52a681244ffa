//! 7TV Core — emote set domain types, configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::SevenTvConfig;
pub use error::{Error, Result};
pub use types::{Emote, EmoteSet, EmoteSetConfig};
