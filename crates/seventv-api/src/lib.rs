//! 7TV API — remote client for emote sets.
//!
//! Provides the `EmoteSetApi` trait consumed by the reconciler.
//! `HttpClient` talks to the 7TV REST and GraphQL endpoints;
//! `MemoryApi` keeps everything in process and journals every call.

pub mod client;
pub mod http;
pub mod memory;

pub use client::EmoteSetApi;
pub use http::HttpClient;
pub use memory::{ApiCall, ApiOperation, MemoryApi};
