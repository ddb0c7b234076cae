#[cfg(test)]
mod tests {
    use crate::config::ChatSettings;
    use crate::error::{ChatError, Result};
    use crate::session::{
        CONNECTIVITY_FALLBACK_REPLY, ChatController, IDENTITY_REPLY, MemorySessionStore,
        MessageRole, SendOutcome, SendRejection, SessionStore, UNPROCESSED_FALLBACK_REPLY,
    };
    use crate::transport::{ChatRequest, ChatResponse, ChatTransport};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    // Mock transport that replays scripted results and records every request
    struct MockTransport {
        replies: Mutex<VecDeque<Result<ChatResponse>>>,
        requests: Mutex<Vec<ChatRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockTransport {
        fn new(replies: Vec<Result<ChatResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        /// Holds every response until the gate is notified.
        fn gated(replies: Vec<Result<ChatResponse>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(replies)
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatTransport for MockTransport {
        async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ChatError::internal("no scripted reply")))
        }
    }

    // Store whose writes always fail
    struct ReadOnlyStore {
        session_id: String,
    }

    impl SessionStore for ReadOnlyStore {
        fn load_session_id(&self) -> Result<Option<String>> {
            Ok(Some(self.session_id.clone()))
        }

        fn save_session_id(&self, _session_id: &str) -> Result<()> {
            Err(ChatError::storage("read-only"))
        }
    }

    fn reply(text: &str) -> Result<ChatResponse> {
        Ok(ChatResponse {
            response: Some(text.to_string()),
            session_id: None,
        })
    }

    fn instant_settings() -> ChatSettings {
        ChatSettings {
            canned_reply_delay_ms: 0,
            ..Default::default()
        }
    }

    fn controller_with(
        transport: Arc<MockTransport>,
        store: Arc<MemorySessionStore>,
    ) -> ChatController {
        ChatController::new(transport, store, instant_settings())
    }

    #[test]
    fn test_initialize_generates_and_persists_uuid() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let store = Arc::new(MemorySessionStore::new());
        let controller = controller_with(transport.clone(), store.clone());

        assert_eq!(controller.session_id(), None);

        let session_id = controller.initialize().unwrap();
        assert!(uuid::Uuid::parse_str(&session_id).is_ok());
        assert_eq!(store.current(), Some(session_id.clone()));
        assert_eq!(controller.session_id(), Some(session_id.clone()));

        // Idempotent
        assert_eq!(controller.initialize().unwrap(), session_id);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_initialize_reuses_stored_id() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let store = Arc::new(MemorySessionStore::with_session_id("saved-id"));
        let controller = controller_with(transport, store);

        assert_eq!(controller.initialize().unwrap(), "saved-id");
    }

    #[test]
    fn test_initialize_propagates_storage_errors() {
        struct BrokenStore;

        impl SessionStore for BrokenStore {
            fn load_session_id(&self) -> Result<Option<String>> {
                Err(ChatError::storage("disk gone"))
            }

            fn save_session_id(&self, _session_id: &str) -> Result<()> {
                Ok(())
            }
        }

        let controller = ChatController::new(
            Arc::new(MockTransport::new(vec![])),
            Arc::new(BrokenStore),
            instant_settings(),
        );
        assert!(controller.initialize().is_err());
        assert_eq!(controller.session_id(), None);
    }

    #[tokio::test]
    async fn test_end_to_end_reply() {
        let transport = Arc::new(MockTransport::new(vec![reply("Hi there")]));
        let store = Arc::new(MemorySessionStore::new());
        let controller = controller_with(transport.clone(), store.clone());
        let session_id = controller.initialize().unwrap();

        let outcome = controller.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::Replied { fallback: false }));

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user());
        assert_eq!(messages[0].text, "Hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].text, "Hi there");
        assert_ne!(messages[0].id, messages[1].id);

        assert!(!controller.is_awaiting_reply());
        assert_eq!(controller.session_id(), Some(session_id.clone()));
        assert_eq!(
            transport.requests(),
            vec![ChatRequest {
                text: "Hello".to_string(),
                session_id,
            }]
        );
    }

    #[tokio::test]
    async fn test_raw_input_is_sent_untrimmed() {
        let transport = Arc::new(MockTransport::new(vec![reply("ok")]));
        let controller = controller_with(transport.clone(), Arc::new(MemorySessionStore::new()));
        controller.initialize().unwrap();

        controller.send("  spaced out  ").await;

        assert_eq!(transport.requests()[0].text, "  spaced out  ");
        assert_eq!(controller.messages()[0].text, "  spaced out  ");
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let controller = controller_with(transport.clone(), Arc::new(MemorySessionStore::new()));
        controller.initialize().unwrap();

        for input in ["", "   ", "\n\t"] {
            let outcome = controller.send(input).await;
            assert!(matches!(
                outcome,
                SendOutcome::Rejected(SendRejection::BlankInput)
            ));
        }
        assert_eq!(controller.message_count(), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_send_before_initialize_is_rejected() {
        let transport = Arc::new(MockTransport::new(vec![reply("unused")]));
        let controller = controller_with(transport.clone(), Arc::new(MemorySessionStore::new()));

        let outcome = controller.send("Hello").await;
        assert!(matches!(
            outcome,
            SendOutcome::Rejected(SendRejection::NoSession)
        ));
        assert_eq!(controller.message_count(), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_second_send_while_in_flight_is_noop() {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(MockTransport::gated(vec![reply("First")], gate.clone()));
        let controller = Arc::new(controller_with(
            transport.clone(),
            Arc::new(MemorySessionStore::new()),
        ));
        controller.initialize().unwrap();

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.send("First question").await })
        };

        while !controller.is_awaiting_reply() || transport.requests().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.message_count(), 1);

        let second = controller.send("Second question").await;
        assert!(matches!(
            second,
            SendOutcome::Rejected(SendRejection::InFlight)
        ));
        assert_eq!(controller.message_count(), 1);
        assert_eq!(transport.requests().len(), 1);

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, SendOutcome::Replied { fallback: false }));
        assert!(!controller.is_awaiting_reply());
        assert_eq!(controller.message_count(), 2);
    }

    #[tokio::test]
    async fn test_identity_question_answered_locally() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let store = Arc::new(MemorySessionStore::new());
        let controller = controller_with(transport.clone(), store);
        let session_id = controller.initialize().unwrap();

        let outcome = controller.send("Who are you?").await;
        assert!(matches!(outcome, SendOutcome::CannedReply));

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "Who are you?");
        assert!(messages[0].is_user());
        assert_eq!(messages[1].text, IDENTITY_REPLY);
        assert!(!messages[1].is_user());

        assert!(transport.requests().is_empty());
        assert!(!controller.is_awaiting_reply());
        assert_eq!(controller.session_id(), Some(session_id));
    }

    #[tokio::test]
    async fn test_identity_reply_waits_for_simulated_delay() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let controller = Arc::new(ChatController::new(
            transport,
            Arc::new(MemorySessionStore::new()),
            ChatSettings {
                canned_reply_delay_ms: 50,
                ..Default::default()
            },
        ));
        controller.initialize().unwrap();

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.send("introduce yourself").await })
        };

        while controller.message_count() == 0 {
            tokio::task::yield_now().await;
        }
        // The user message is visible before the canned reply arrives
        assert_eq!(controller.message_count(), 1);
        assert!(controller.is_awaiting_reply());

        task.await.unwrap();
        assert_eq!(controller.message_count(), 2);
        assert!(!controller.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_session_reset_clears_history() {
        let transport = Arc::new(MockTransport::new(vec![
            reply("Earlier answer"),
            Ok(ChatResponse {
                response: None,
                session_id: Some("new-id".to_string()),
            }),
        ]));
        let store = Arc::new(MemorySessionStore::with_session_id("old-id"));
        let controller = controller_with(transport, store.clone());
        controller.initialize().unwrap();

        controller.send("First").await;
        assert_eq!(controller.message_count(), 2);

        let outcome = controller.send("Second").await;
        match outcome {
            SendOutcome::SessionReset { previous, current } => {
                assert_eq!(previous, "old-id");
                assert_eq!(current, "new-id");
            }
            other => panic!("expected session reset, got {:?}", other),
        }

        assert!(controller.messages().is_empty());
        assert_eq!(controller.session_id(), Some("new-id".to_string()));
        assert_eq!(store.current(), Some("new-id".to_string()));
        assert!(!controller.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_same_session_id_without_reply_is_fallback() {
        let transport = Arc::new(MockTransport::new(vec![Ok(ChatResponse {
            response: Some(String::new()),
            session_id: Some("old-id".to_string()),
        })]));
        let store = Arc::new(MemorySessionStore::with_session_id("old-id"));
        let controller = controller_with(transport, store);
        controller.initialize().unwrap();

        let outcome = controller.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::Replied { fallback: true }));

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, UNPROCESSED_FALLBACK_REPLY);
        assert_eq!(controller.session_id(), Some("old-id".to_string()));
    }

    #[tokio::test]
    async fn test_reply_with_new_session_id_is_a_normal_reply() {
        let transport = Arc::new(MockTransport::new(vec![Ok(ChatResponse {
            response: Some("Answer".to_string()),
            session_id: Some("new-id".to_string()),
        })]));
        let controller = controller_with(
            transport,
            Arc::new(MemorySessionStore::with_session_id("old-id")),
        );
        controller.initialize().unwrap();

        let outcome = controller.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::Replied { fallback: false }));
        assert_eq!(controller.messages()[1].text, "Answer");
        assert_eq!(controller.session_id(), Some("old-id".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_appends_fallback() {
        let transport = Arc::new(MockTransport::new(vec![Err(ChatError::transport(
            "connection refused",
        ))]));
        let controller = controller_with(transport, Arc::new(MemorySessionStore::new()));
        controller.initialize().unwrap();

        let outcome = controller.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::Failed(ref err) if err.is_transport_failure()));

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, CONNECTIVITY_FALLBACK_REPLY);
        assert!(!controller.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_http_status_failure_appends_fallback() {
        let transport = Arc::new(MockTransport::new(vec![Err(ChatError::http_status(
            503,
            "unavailable",
        ))]));
        let controller = controller_with(transport, Arc::new(MemorySessionStore::new()));
        controller.initialize().unwrap();

        controller.send("Hello").await;
        assert_eq!(controller.messages()[1].text, CONNECTIVITY_FALLBACK_REPLY);

        // Ready for the next turn
        assert!(!controller.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_reset_survives_persist_failure() {
        let transport = Arc::new(MockTransport::new(vec![Ok(ChatResponse {
            response: None,
            session_id: Some("rotated".to_string()),
        })]));
        let controller = ChatController::new(
            transport,
            Arc::new(ReadOnlyStore {
                session_id: "pinned".to_string(),
            }),
            instant_settings(),
        );
        controller.initialize().unwrap();

        let outcome = controller.send("Hello").await;
        assert!(matches!(outcome, SendOutcome::SessionReset { .. }));
        assert_eq!(controller.session_id(), Some("rotated".to_string()));
    }

    #[tokio::test]
    async fn test_send_pending_clears_input() {
        let transport = Arc::new(MockTransport::new(vec![reply("Sure")]));
        let controller = controller_with(transport.clone(), Arc::new(MemorySessionStore::new()));
        controller.initialize().unwrap();

        controller.set_pending_input("Tell me about LPG");
        let outcome = controller.send_pending().await;

        assert!(matches!(outcome, SendOutcome::Replied { .. }));
        assert_eq!(controller.pending_input(), "");
        assert_eq!(transport.requests()[0].text, "Tell me about LPG");
    }
}
