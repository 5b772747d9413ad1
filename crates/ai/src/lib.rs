//! AI collaborator for Questline
//!
//! HTTP proxy to the external AI server, deterministic placeholder
//! generators standing in for it, and the realtime event-name mapping.

mod client;
pub mod error;
pub mod placeholder;
pub mod realtime;
#[cfg(test)]
mod tests;

pub use client::{AiClient, PROXY_TIMEOUT_SECS};
pub use error::AiError;
pub use realtime::{ClientCommand, RealtimeEvent, namespace_for};
