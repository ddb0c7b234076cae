//! Chat session controller.
//!
//! Owns the session id, the local message history, the pending input and the
//! in-flight flag. Every user turn goes through [`ChatController::send`]:
//!
//! ```text
//! Idle -> Sending -> IdentityReply ----------------------------> Idle
//!                 -> NetworkRoundTrip -> Appended ---------------> Idle
//!                                     -> SessionReset -----------> Idle
//!                                     -> FailureAppended --------> Idle
//! ```
//!
//! At most one send runs at a time. The guard is checked and set
//! synchronously before the first suspension point, so overlapping sends are
//! rejected rather than queued.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::identity::{IDENTITY_REPLY, is_identity_query};
use super::message::{Message, MessageRole};
use super::store::SessionStore;
use crate::config::ChatSettings;
use crate::error::{ChatError, Result};
use crate::transport::{ChatRequest, ChatResponse, ChatTransport};

/// Shown when the endpoint answers without any reply text.
pub const UNPROCESSED_FALLBACK_REPLY: &str =
    "I apologize, but I couldn't process your request at the moment. Please try again.";

/// Shown when the endpoint cannot be reached or answers with garbage.
pub const CONNECTIVITY_FALLBACK_REPLY: &str = "I'm sorry, but I'm having trouble connecting to the server right now. Please check your internet connection and try again later.";

/// Why a send was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// Input was empty or whitespace only.
    BlankInput,
    /// Another send has not resolved yet.
    InFlight,
    /// [`ChatController::initialize`] has not run.
    NoSession,
}

/// How a send resolved.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Nothing happened: no message appended, no request issued.
    Rejected(SendRejection),
    /// An identity question was answered locally.
    CannedReply,
    /// The endpoint replied. `fallback` is set when its reply was empty and
    /// the generic "could not process" text was shown instead.
    Replied { fallback: bool },
    /// The server rotated the session; history was cleared.
    SessionReset { previous: String, current: String },
    /// The request failed and the connectivity notice was shown.
    Failed(ChatError),
}

/// Clears the in-flight flag when the send finishes, whichever path it took.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Manages one chat conversation against the external endpoint.
///
/// All state is private; views read snapshots through the accessors. The
/// controller is `Send + Sync` so a UI loop can share it behind an `Arc`
/// while a send is awaiting the network.
pub struct ChatController {
    transport: Arc<dyn ChatTransport>,
    store: Arc<dyn SessionStore>,
    settings: ChatSettings,
    session_id: RwLock<Option<String>>,
    messages: RwLock<Vec<Message>>,
    pending_input: RwLock<String>,
    awaiting_reply: AtomicBool,
    next_seq: AtomicU64,
}

impl ChatController {
    /// Creates a controller with no session id and an empty history.
    ///
    /// Call [`initialize`](Self::initialize) before sending.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        store: Arc<dyn SessionStore>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            transport,
            store,
            settings,
            session_id: RwLock::new(None),
            messages: RwLock::new(Vec::new()),
            pending_input: RwLock::new(String::new()),
            awaiting_reply: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Loads the persisted session id, generating and persisting a fresh UUID
    /// if none is stored. Makes no network call.
    ///
    /// Returns the active session id. Calling it again is a no-op that returns
    /// the id already in use.
    pub fn initialize(&self) -> Result<String> {
        if let Some(existing) = self.session_id() {
            return Ok(existing);
        }

        let session_id = match self.store.load_session_id()? {
            Some(saved) if !saved.trim().is_empty() => {
                tracing::debug!(session_id = %saved, "Restored chat session");
                saved
            }
            _ => {
                let generated = Uuid::new_v4().to_string();
                self.store.save_session_id(&generated)?;
                tracing::info!(session_id = %generated, "Created new chat session");
                generated
            }
        };

        *write(&self.session_id) = Some(session_id.clone());
        Ok(session_id)
    }

    pub fn session_id(&self) -> Option<String> {
        read(&self.session_id).clone()
    }

    /// Snapshot of the message history, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        read(&self.messages).clone()
    }

    pub fn message_count(&self) -> usize {
        read(&self.messages).len()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply.load(Ordering::SeqCst)
    }

    pub fn pending_input(&self) -> String {
        read(&self.pending_input).clone()
    }

    pub fn set_pending_input(&self, text: impl Into<String>) {
        *write(&self.pending_input) = text.into();
    }

    /// Sends whatever is in the pending input.
    pub async fn send_pending(&self) -> SendOutcome {
        let text = self.pending_input();
        self.send(&text).await
    }

    /// Sends one user turn and folds the result into local state.
    ///
    /// Never fails: transport errors become a fallback assistant message and
    /// are returned as [`SendOutcome::Failed`] for the caller's information.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Rejected(SendRejection::BlankInput);
        }
        if self.is_awaiting_reply() {
            return SendOutcome::Rejected(SendRejection::InFlight);
        }
        let Some(session_id) = self.session_id() else {
            return SendOutcome::Rejected(SendRejection::NoSession);
        };
        if self
            .awaiting_reply
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SendOutcome::Rejected(SendRejection::InFlight);
        }
        let _guard = InFlightGuard(&self.awaiting_reply);

        self.append(MessageRole::User, text);
        write(&self.pending_input).clear();

        if is_identity_query(text) {
            tokio::time::sleep(self.settings.canned_reply_delay()).await;
            self.append(MessageRole::Assistant, IDENTITY_REPLY);
            return SendOutcome::CannedReply;
        }

        let request = ChatRequest {
            text: text.to_string(),
            session_id,
        };

        match self.transport.send(&request).await {
            Ok(response) => self.apply_response(response),
            Err(err) => {
                tracing::error!(
                    session_id = %request.session_id,
                    error = %err,
                    "Chat request failed"
                );
                self.append(MessageRole::Assistant, CONNECTIVITY_FALLBACK_REPLY);
                SendOutcome::Failed(err)
            }
        }
    }

    fn apply_response(&self, response: ChatResponse) -> SendOutcome {
        let current = self.session_id().unwrap_or_default();

        if let Some(new_id) = response.reset_session_id(&current) {
            self.reset_session(new_id);
            return SendOutcome::SessionReset {
                previous: current,
                current: new_id.to_string(),
            };
        }

        match response.reply_text() {
            Some(reply) => {
                self.append(MessageRole::Assistant, reply);
                SendOutcome::Replied { fallback: false }
            }
            None => {
                tracing::warn!(session_id = %current, "Chat endpoint returned an empty reply");
                self.append(MessageRole::Assistant, UNPROCESSED_FALLBACK_REPLY);
                SendOutcome::Replied { fallback: true }
            }
        }
    }

    /// Drops the local history and adopts a server-issued session id.
    fn reset_session(&self, new_id: &str) {
        write(&self.messages).clear();
        *write(&self.session_id) = Some(new_id.to_string());

        // The rotation stands even if it cannot be persisted
        if let Err(err) = self.store.save_session_id(new_id) {
            tracing::warn!(session_id = %new_id, error = %err, "Failed to persist rotated session id");
        }
        tracing::info!(session_id = %new_id, "Server reset the chat session");
    }

    fn append(&self, role: MessageRole, text: &str) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        write(&self.messages).push(Message::new(seq, text, role));
    }
}
