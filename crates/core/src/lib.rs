//! Core types and constants for the Questline backend
//!
//! This crate contains domain types shared across all other crates.

mod character;
mod constants;
mod conversation;
mod env_config;
mod error;
mod game;
mod legacy;
mod message;
mod progress;
mod session;
mod user;

pub use character::*;
pub use constants::*;
pub use conversation::*;
pub use env_config::*;
pub use error::*;
pub use game::*;
pub use legacy::*;
pub use message::*;
pub use progress::*;
pub use session::*;
pub use user::*;
