//! Network side of the chat client.
//!
//! Provides [`HttpChatTransport`], the reqwest implementation of
//! [`wlga_core::transport::ChatTransport`].

pub mod http_chat_transport;

pub use http_chat_transport::HttpChatTransport;
