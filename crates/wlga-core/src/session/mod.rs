//! Chat session domain.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`Message`, `MessageRole`)
//! - `identity`: Local detection of "who are you" style questions
//! - `store`: Storage port for the persisted session id
//! - `controller`: Session lifecycle and send flow (`ChatController`)

mod controller;
mod identity;
mod message;
mod store;

#[cfg(test)]
mod controller_test;

// Re-export public API
pub use controller::{
    CONNECTIVITY_FALLBACK_REPLY, ChatController, SendOutcome, SendRejection,
    UNPROCESSED_FALLBACK_REPLY,
};
pub use identity::{IDENTITY_PATTERNS, IDENTITY_REPLY, is_identity_query};
pub use message::{Message, MessageRole};
pub use store::{MemorySessionStore, SessionStore};
