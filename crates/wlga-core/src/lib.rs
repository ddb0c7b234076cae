//! Core domain of the WLGA chat client.
//!
//! - `format`: turns raw assistant replies into display line records
//! - `session`: messages, the chat session controller and its storage port
//! - `transport`: the port to the external chat endpoint
//! - `config`: client configuration model
//! - `samples`: canned sample questions for the empty state

pub mod config;
pub mod error;
pub mod format;
pub mod samples;
pub mod session;
pub mod transport;

// Re-export common error type
pub use error::ChatError;
