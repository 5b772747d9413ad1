//! Storage backend trait abstraction
//!
//! Async domain traits for storage operations, one per aggregate.

pub mod catalog;
pub mod character;
pub mod conversation;
pub mod game;
pub mod message;
pub mod progress;
pub mod session;
pub mod user;

pub use catalog::{CatalogStore, SaveSlotStore};
pub use character::CharacterStore;
pub use conversation::ConversationStore;
pub use game::GameStore;
pub use message::MessageStore;
pub use progress::ProgressStore;
pub use session::SessionStore;
pub use user::UserStore;
