//! The conversation session: the only owner and mutator of the log.
//!
//! One call to [`ConversationSession::send_message`] runs a whole turn:
//! append the user message, open a pending reply, stream deltas into it and
//! settle it as completed or failed. Errors never escape a turn; they end up
//! as the reply's text and in [`SessionState::last_error`].
//!
//! Turns are serialised by `&mut self`. Callers that share a session across
//! tasks put it behind a `tokio::sync::Mutex`, which queues turns.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gatechat_types::config::HISTORY_WINDOW;
use gatechat_types::error::{SessionError, describe, failure_text};
use gatechat_types::event::SessionEvent;
use gatechat_types::message::{Message, MessageRole};
use gatechat_types::notification::{DeliveryTransport, Notification};
use gatechat_types::protocol::WireMessage;

use super::log::ConversationLog;
use crate::event::EventBus;
use crate::feedback::{Feedback, FeedbackSignaler};
use crate::store::ConversationStore;
use crate::transport::ChatTransport;

/// Where the current (or most recent) turn is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    UserAppended,
    AwaitingFirstDelta,
    Streaming,
    Completed,
    Failed,
}

/// Observable state next to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Last known gateway reachability. Starts optimistic.
    pub reachable: bool,
    /// True from the start of a turn until its first delta arrives.
    pub thinking: bool,
    /// Description of the most recent failure, if it has not been cleared.
    pub last_error: Option<String>,
    pub phase: TurnPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            reachable: true,
            thinking: false,
            last_error: None,
            phase: TurnPhase::Idle,
        }
    }
}

pub struct ConversationSession<T, S> {
    transport: T,
    store: S,
    feedback: Arc<dyn FeedbackSignaler>,
    log: ConversationLog,
    state: SessionState,
    events: EventBus,
    seen_notifications: HashSet<String>,
}

impl<T: ChatTransport, S: ConversationStore> ConversationSession<T, S> {
    /// Open a session, loading the stored conversation once.
    ///
    /// A store that fails to load is logged and the session starts empty.
    pub async fn open(transport: T, store: S, feedback: Arc<dyn FeedbackSignaler>) -> Self {
        let messages = match store.load().await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "failed to load conversation, starting empty");
                Vec::new()
            }
        };
        debug!(message_count = messages.len(), "conversation loaded");

        Self {
            transport,
            store,
            feedback,
            log: ConversationLog::from_messages(messages),
            state: SessionState::default(),
            events: EventBus::default(),
            seen_notifications: HashSet::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.log.as_slice()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_reachable(&self) -> bool {
        self.state.reachable
    }

    pub fn is_thinking(&self) -> bool {
        self.state.thinking
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Run one streamed turn for `text`. Blank input is ignored.
    pub async fn send_message(&mut self, text: &str) {
        self.send_message_with_cancel(text, CancellationToken::new())
            .await;
    }

    /// Like [`send_message`](Self::send_message), but `cancel` ends the
    /// stream early. A cancelled turn completes with whatever text arrived.
    pub async fn send_message_with_cancel(&mut self, text: &str, cancel: CancellationToken) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let user_id = self.log.push_user(text);
        self.state.phase = TurnPhase::UserAppended;
        self.events.publish(SessionEvent::MessageAppended {
            message_id: user_id,
            role: MessageRole::User,
            pending: false,
        });
        self.feedback.signal(Feedback::MessageSent);

        let reply_id = self.log.begin_assistant();
        self.events.publish(SessionEvent::MessageAppended {
            message_id: reply_id,
            role: MessageRole::Assistant,
            pending: true,
        });
        self.state.phase = TurnPhase::AwaitingFirstDelta;
        self.set_thinking(true);

        let history = self.log.history_window(HISTORY_WINDOW);
        debug!(message_count = history.len(), "starting turn");

        match self.stream_reply(reply_id, history, cancel).await {
            Ok(()) => self.complete_turn(reply_id),
            Err(e) => self.fail_turn(reply_id, &e),
        }

        self.persist().await;
    }

    async fn stream_reply(
        &mut self,
        reply_id: Uuid,
        history: Vec<WireMessage>,
        cancel: CancellationToken,
    ) -> Result<(), SessionError> {
        let mut deltas = self.transport.stream_chat(history, cancel.clone());

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("turn cancelled");
                    break;
                }
                next = deltas.next() => next,
            };
            let Some(delta) = next else { break };
            let delta = delta?;

            if self.state.phase == TurnPhase::AwaitingFirstDelta {
                self.state.phase = TurnPhase::Streaming;
                self.set_thinking(false);
            }
            self.log.append_delta(&delta);
            self.events.publish(SessionEvent::DeltaReceived {
                message_id: reply_id,
                text: delta,
            });
        }

        Ok(())
    }

    fn complete_turn(&mut self, reply_id: Uuid) {
        self.set_thinking(false);
        let content = self
            .log
            .finish_pending()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.state.last_error = None;
        self.state.phase = TurnPhase::Completed;
        debug!(reply_len = content.len(), "turn completed");

        self.events.publish(SessionEvent::TurnCompleted {
            message_id: reply_id,
            content,
        });
        self.feedback.signal(Feedback::ResponseComplete);
    }

    fn fail_turn(&mut self, reply_id: Uuid, err: &SessionError) {
        warn!(error = %err, "turn failed");
        self.set_thinking(false);
        self.log.fail_pending(failure_text(err));
        self.state.last_error = Some(describe(err));
        if err.marks_unreachable() {
            self.set_reachable(false);
        }
        self.state.phase = TurnPhase::Failed;

        self.events.publish(SessionEvent::TurnFailed {
            message_id: reply_id,
            error: describe(err),
        });
        self.feedback.signal(Feedback::Error);
    }

    /// Send `text` as a one-message, non-streamed request.
    ///
    /// The log is not touched. Returns `None` for blank input or any failure.
    pub async fn quick_send(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let history = vec![WireMessage::new(MessageRole::User.to_string(), text)];
        match self.transport.send_chat(history).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, "quick send failed");
                None
            }
        }
    }

    /// Probe the gateway and record the result.
    pub async fn check_gateway_connection(&mut self) -> bool {
        let reachable = self.transport.ping_gateway().await;
        self.set_reachable(reachable);
        if reachable {
            self.feedback.signal(Feedback::Connected);
        }
        reachable
    }

    /// Empty the log and the store, and forget the last error.
    pub async fn clear_conversation(&mut self) {
        self.log.clear();
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear stored conversation");
        }
        self.state.last_error = None;
        self.state.phase = TurnPhase::Idle;
        self.events.publish(SessionEvent::ConversationCleared);
    }

    /// Remove the last exchange and send its user text again.
    pub async fn retry_last_message(&mut self) {
        self.retry_last_message_with_cancel(CancellationToken::new())
            .await;
    }

    pub async fn retry_last_message_with_cancel(&mut self, cancel: CancellationToken) {
        let Some(text) = self.log.take_last_exchange() else {
            debug!("nothing to retry");
            return;
        };
        self.send_message_with_cancel(&text, cancel).await;
    }

    /// Append an out-of-band notification as an assistant message.
    ///
    /// Notifications are deduplicated by [`Notification::delivery_key`]
    /// across every transport. Returns whether the message was appended.
    pub async fn consume_notification(
        &mut self,
        notification: &Notification,
        transport: DeliveryTransport,
    ) -> bool {
        let key = notification.delivery_key();
        if !self.seen_notifications.insert(key) {
            debug!(%transport, "duplicate notification dropped");
            return false;
        }

        let message_id = self
            .log
            .push(Message::assistant(notification.display_text()));
        self.events.publish(SessionEvent::MessageAppended {
            message_id,
            role: MessageRole::Assistant,
            pending: false,
        });
        self.events.publish(SessionEvent::NotificationConsumed {
            message_id,
            transport,
        });
        info!(%transport, "notification consumed");

        self.persist().await;
        true
    }

    fn set_thinking(&mut self, thinking: bool) {
        if self.state.thinking != thinking {
            self.state.thinking = thinking;
            self.events
                .publish(SessionEvent::ThinkingChanged { thinking });
        }
    }

    fn set_reachable(&mut self, reachable: bool) {
        if self.state.reachable != reachable {
            self.state.reachable = reachable;
            self.events
                .publish(SessionEvent::ReachabilityChanged { reachable });
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(self.log.as_slice()).await {
            warn!(error = %e, "failed to save conversation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;
    use std::time::Duration;

    use gatechat_types::error::StoreError;

    use crate::transport::DeltaStream;

    // --- Mocks ---

    #[derive(Clone)]
    enum Script {
        Deltas(Vec<&'static str>),
        FailAfter(Vec<&'static str>, SessionError),
        HangAfter(Vec<&'static str>),
    }

    struct MockTransport {
        script: Script,
        reply: Result<String, SessionError>,
        healthy: bool,
        requests: Arc<Mutex<Vec<Vec<WireMessage>>>>,
    }

    impl MockTransport {
        fn streaming(deltas: Vec<&'static str>) -> Self {
            Self::with_script(Script::Deltas(deltas))
        }

        fn with_script(script: Script) -> Self {
            Self {
                script,
                reply: Ok("pong".to_string()),
                healthy: true,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> Vec<Vec<WireMessage>> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ChatTransport for MockTransport {
        fn stream_chat(&self, messages: Vec<WireMessage>, _cancel: CancellationToken) -> DeltaStream {
            self.requests.lock().unwrap().push(messages);
            let script = self.script.clone();
            Box::pin(async_stream::stream! {
                match script {
                    Script::Deltas(deltas) => {
                        for d in deltas {
                            yield Ok(d.to_string());
                        }
                    }
                    Script::FailAfter(deltas, err) => {
                        for d in deltas {
                            yield Ok(d.to_string());
                        }
                        yield Err(err);
                    }
                    Script::HangAfter(deltas) => {
                        for d in deltas {
                            yield Ok(d.to_string());
                        }
                        futures_util::future::pending::<()>().await;
                    }
                }
            })
        }

        fn send_chat(
            &self,
            messages: Vec<WireMessage>,
        ) -> impl Future<Output = Result<String, SessionError>> + Send {
            self.requests.lock().unwrap().push(messages);
            let reply = self.reply.clone();
            async move { reply }
        }

        fn ping_gateway(&self) -> impl Future<Output = bool> + Send {
            let healthy = self.healthy;
            async move { healthy }
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        saved: Arc<Mutex<Vec<Message>>>,
        saves: Arc<Mutex<usize>>,
        fail_load: bool,
    }

    impl MockStore {
        fn with_messages(messages: Vec<Message>) -> Self {
            let store = Self::default();
            *store.saved.lock().unwrap() = messages;
            store
        }

        fn saved(&self) -> Vec<Message> {
            self.saved.lock().unwrap().clone()
        }

        fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    impl ConversationStore for MockStore {
        fn load(&self) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send {
            let result = if self.fail_load {
                Err(StoreError::Io("disk on fire".to_string()))
            } else {
                Ok(self.saved())
            };
            async move { result }
        }

        fn save(&self, messages: &[Message]) -> impl Future<Output = Result<(), StoreError>> + Send {
            *self.saved.lock().unwrap() = messages.to_vec();
            *self.saves.lock().unwrap() += 1;
            async { Ok(()) }
        }

        fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
            self.saved.lock().unwrap().clear();
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct RecordingFeedback {
        signals: Mutex<Vec<Feedback>>,
    }

    impl RecordingFeedback {
        fn signals(&self) -> Vec<Feedback> {
            self.signals.lock().unwrap().clone()
        }
    }

    impl FeedbackSignaler for RecordingFeedback {
        fn signal(&self, feedback: Feedback) {
            self.signals.lock().unwrap().push(feedback);
        }
    }

    async fn open_session(
        transport: MockTransport,
        store: MockStore,
    ) -> (ConversationSession<MockTransport, MockStore>, Arc<RecordingFeedback>) {
        let feedback = Arc::new(RecordingFeedback::default());
        let session = ConversationSession::open(transport, store, feedback.clone()).await;
        (session, feedback)
    }

    fn contents(session: &ConversationSession<MockTransport, MockStore>) -> Vec<(MessageRole, String)> {
        session
            .messages()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // --- Turns ---

    #[tokio::test]
    async fn test_send_message_streams_reply() {
        let store = MockStore::default();
        let (mut session, feedback) =
            open_session(MockTransport::streaming(vec!["Hi", " there", "!"]), store.clone()).await;

        session.send_message("hello").await;

        assert_eq!(
            contents(&session),
            vec![
                (MessageRole::User, "hello".to_string()),
                (MessageRole::Assistant, "Hi there!".to_string()),
            ]
        );
        assert!(session.messages().iter().all(|m| !m.pending));
        assert_eq!(session.phase(), TurnPhase::Completed);
        assert!(!session.is_thinking());
        assert_eq!(session.last_error(), None);
        assert_eq!(
            feedback.signals(),
            vec![Feedback::MessageSent, Feedback::ResponseComplete]
        );
        assert_eq!(store.saved().len(), 2);
    }

    #[tokio::test]
    async fn test_send_message_trims_and_ignores_blank() {
        let transport = MockTransport::streaming(vec!["ok"]);
        let (mut session, feedback) = open_session(transport, MockStore::default()).await;

        session.send_message("   \n\t").await;
        assert!(session.messages().is_empty());
        assert!(session.transport.requests().is_empty());
        assert!(feedback.signals().is_empty());

        session.send_message("  hi  ").await;
        assert_eq!(session.messages()[0].content, "hi");
    }

    #[tokio::test]
    async fn test_thinking_until_first_delta() {
        let (mut session, _) =
            open_session(MockTransport::streaming(vec!["a", "b"]), MockStore::default()).await;
        let mut rx = session.subscribe();

        session.send_message("q").await;

        let events = drain(&mut rx);
        let thinking: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::ThinkingChanged { thinking } => Some(*thinking),
                _ => None,
            })
            .collect();
        assert_eq!(thinking, vec![true, false]);

        // Thinking turns off before the first delta is broadcast.
        let off = events
            .iter()
            .position(|e| matches!(e, SessionEvent::ThinkingChanged { thinking: false }))
            .unwrap();
        let first_delta = events
            .iter()
            .position(|e| matches!(e, SessionEvent::DeltaReceived { .. }))
            .unwrap();
        assert!(off < first_delta);
        assert!(matches!(events.last(), Some(SessionEvent::TurnCompleted { content, .. }) if content == "ab"));
    }

    #[tokio::test]
    async fn test_empty_first_delta_ends_thinking() {
        let (mut session, _) =
            open_session(MockTransport::streaming(vec!["", "x"]), MockStore::default()).await;
        let mut rx = session.subscribe();

        session.send_message("q").await;

        let events = drain(&mut rx);
        let off = events
            .iter()
            .position(|e| matches!(e, SessionEvent::ThinkingChanged { thinking: false }))
            .unwrap();
        let first_delta = events
            .iter()
            .position(|e| matches!(e, SessionEvent::DeltaReceived { text, .. } if text.is_empty()))
            .unwrap();
        assert!(off < first_delta);
        assert_eq!(session.phase(), TurnPhase::Completed);
        assert_eq!(session.messages().last().unwrap().content, "x");
    }

    #[tokio::test]
    async fn test_empty_stream_completes() {
        let store = MockStore::default();
        let (mut session, _) = open_session(MockTransport::streaming(vec![]), store.clone()).await;

        session.send_message("hello").await;

        let reply = session.messages().last().unwrap();
        assert_eq!(reply.content, "");
        assert!(!reply.pending);
        assert_eq!(session.phase(), TurnPhase::Completed);
        assert!(!session.is_thinking());
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_authentication_failure_keeps_reachability() {
        let transport = MockTransport::with_script(Script::FailAfter(
            vec![],
            SessionError::AuthenticationFailure,
        ));
        let store = MockStore::default();
        let (mut session, feedback) = open_session(transport, store.clone()).await;

        session.send_message("ping").await;

        let reply = session.messages().last().unwrap();
        assert_eq!(reply.content, "⚠️ Authentication failed. Check the gateway token.");
        assert!(!reply.pending);
        assert!(session.is_reachable());
        assert_eq!(
            session.last_error(),
            Some("Authentication failed. Check the gateway token.")
        );
        assert_eq!(session.phase(), TurnPhase::Failed);
        assert_eq!(feedback.signals(), vec![Feedback::MessageSent, Feedback::Error]);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_failure_marks_unreachable() {
        let transport =
            MockTransport::with_script(Script::FailAfter(vec![], SessionError::Unreachable));
        let (mut session, _) = open_session(transport, MockStore::default()).await;
        let mut rx = session.subscribe();

        session.send_message("ping").await;

        assert!(!session.is_reachable());
        assert!(
            drain(&mut rx).contains(&SessionEvent::ReachabilityChanged { reachable: false })
        );
    }

    #[tokio::test]
    async fn test_transport_failure_mid_stream_replaces_partial_reply() {
        let err = SessionError::TransportFailure("connection reset".to_string());
        let transport = MockTransport::with_script(Script::FailAfter(vec!["Hal"], err.clone()));
        let (mut session, _) = open_session(transport, MockStore::default()).await;

        session.send_message("hello").await;

        let reply = session.messages().last().unwrap();
        assert_eq!(reply.content, failure_text(&err));
        assert!(session.is_reachable());
        assert!(!session.is_thinking());
    }

    #[tokio::test]
    async fn test_successful_turn_clears_last_error() {
        let transport = MockTransport::with_script(Script::FailAfter(
            vec![],
            SessionError::HttpFailure {
                status: 500,
                message: "boom".to_string(),
            },
        ));
        let (mut session, _) = open_session(transport, MockStore::default()).await;
        session.send_message("one").await;
        assert!(session.last_error().is_some());

        session.transport.script = Script::Deltas(vec!["fine"]);
        session.send_message("two").await;
        assert_eq!(session.last_error(), None);
    }

    #[tokio::test]
    async fn test_cancel_keeps_partial_reply() {
        let transport = MockTransport::with_script(Script::HangAfter(vec!["Hel", "lo"]));
        let (mut session, feedback) = open_session(transport, MockStore::default()).await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            session.send_message_with_cancel("hi", cancel),
        )
        .await
        .expect("cancelled turn should finish");

        let reply = session.messages().last().unwrap();
        assert_eq!(reply.content, "Hello");
        assert!(!reply.pending);
        assert_eq!(session.phase(), TurnPhase::Completed);
        assert_eq!(
            feedback.signals(),
            vec![Feedback::MessageSent, Feedback::ResponseComplete]
        );
    }

    #[tokio::test]
    async fn test_history_is_windowed_then_filtered() {
        let prior: Vec<Message> = (0..25).map(|i| Message::user(format!("m{i}"))).collect();
        let transport = MockTransport::streaming(vec!["ok"]);
        let (mut session, _) = open_session(transport, MockStore::with_messages(prior)).await;

        session.send_message("new").await;

        let sent = session.transport.requests()[0].clone();
        // 27 messages in the log (25 + user + pending reply); the last 20
        // start at m7 and end with the blank pending reply, which is dropped.
        assert_eq!(sent.len(), 19);
        assert_eq!(sent.first().unwrap().content, "m7");
        assert_eq!(sent.last().unwrap(), &WireMessage::new("user", "new"));
    }

    #[tokio::test]
    async fn test_single_pending_after_every_operation() {
        let stored = vec![Message::user("old"), Message::pending_assistant()];
        let (mut session, _) = open_session(
            MockTransport::streaming(vec!["x"]),
            MockStore::with_messages(stored),
        )
        .await;
        let pending = |s: &ConversationSession<MockTransport, MockStore>| {
            s.messages().iter().filter(|m| m.pending).count()
        };

        assert_eq!(pending(&session), 0);
        session.send_message("a").await;
        assert!(pending(&session) <= 1);
        session
            .consume_notification(&Notification::new(None, "T", "B", None), DeliveryTransport::Live)
            .await;
        assert!(pending(&session) <= 1);
        session.retry_last_message().await;
        assert!(pending(&session) <= 1);
        session.clear_conversation().await;
        assert_eq!(pending(&session), 0);
    }

    // --- Open ---

    #[tokio::test]
    async fn test_open_survives_load_failure() {
        let store = MockStore {
            fail_load: true,
            ..Default::default()
        };
        let session = ConversationSession::open(
            MockTransport::streaming(vec![]),
            store,
            Arc::new(crate::feedback::NoopFeedback),
        )
        .await;
        assert!(session.messages().is_empty());
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert!(session.is_reachable());
    }

    // --- Retry ---

    #[tokio::test]
    async fn test_retry_replaces_failed_exchange() {
        let stored = vec![Message::user("A"), Message::assistant("B")];
        let transport = MockTransport::streaming(vec!["C"]);
        let (mut session, _) = open_session(transport, MockStore::with_messages(stored)).await;

        session.retry_last_message().await;

        assert_eq!(
            contents(&session),
            vec![
                (MessageRole::User, "A".to_string()),
                (MessageRole::Assistant, "C".to_string()),
            ]
        );
        assert_eq!(session.transport.requests()[0], vec![WireMessage::new("user", "A")]);
    }

    #[tokio::test]
    async fn test_retry_without_reply() {
        let stored = vec![Message::user("A")];
        let (mut session, _) = open_session(
            MockTransport::streaming(vec!["C"]),
            MockStore::with_messages(stored),
        )
        .await;

        session.retry_last_message().await;

        assert_eq!(
            contents(&session),
            vec![
                (MessageRole::User, "A".to_string()),
                (MessageRole::Assistant, "C".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_without_user_message_is_noop() {
        let stored = vec![Message::assistant("welcome")];
        let transport = MockTransport::streaming(vec!["C"]);
        let (mut session, feedback) =
            open_session(transport, MockStore::with_messages(stored)).await;

        session.retry_last_message().await;

        assert_eq!(session.messages().len(), 1);
        assert!(session.transport.requests().is_empty());
        assert!(feedback.signals().is_empty());
    }

    // --- Notifications ---

    #[tokio::test]
    async fn test_notification_deduplicated() {
        let store = MockStore::default();
        let (mut session, _) = open_session(MockTransport::streaming(vec![]), store.clone()).await;
        let notification = Notification::new(Some("x".to_string()), "T", "B", None);

        assert!(
            session
                .consume_notification(&notification, DeliveryTransport::Live)
                .await
        );
        assert!(
            !session
                .consume_notification(&notification, DeliveryTransport::Queued)
                .await
        );

        assert_eq!(
            contents(&session),
            vec![(MessageRole::Assistant, "T\nB".to_string())]
        );
        assert!(!session.messages()[0].pending);
        assert_eq!(store.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_notification_event() {
        let (mut session, _) = open_session(MockTransport::streaming(vec![]), MockStore::default()).await;
        let mut rx = session.subscribe();

        session
            .consume_notification(
                &Notification::new(None, "", "body only", Some(7)),
                DeliveryTransport::LatestValue,
            )
            .await;

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::NotificationConsumed {
                transport: DeliveryTransport::LatestValue,
                ..
            }
        )));
        assert_eq!(session.messages()[0].content, "body only");
    }

    // --- Clear ---

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let stored = vec![Message::user("A"), Message::assistant("B")];
        let store = MockStore::with_messages(stored);
        let transport =
            MockTransport::with_script(Script::FailAfter(vec![], SessionError::Unreachable));
        let (mut session, _) = open_session(transport, store.clone()).await;
        session.send_message("C").await;
        assert!(session.last_error().is_some());

        session.clear_conversation().await;
        assert!(session.messages().is_empty());
        assert_eq!(session.last_error(), None);
        assert!(store.load().await.unwrap().is_empty());

        session.clear_conversation().await;
        assert!(session.messages().is_empty());
        assert!(store.load().await.unwrap().is_empty());
    }

    // --- Quick send and health ---

    #[tokio::test]
    async fn test_quick_send_leaves_log_untouched() {
        let transport = MockTransport::streaming(vec![]);
        let (session, _) = open_session(transport, MockStore::default()).await;

        assert_eq!(session.quick_send(" ping ").await.as_deref(), Some("pong"));
        assert!(session.messages().is_empty());
        assert_eq!(session.transport.requests()[0], vec![WireMessage::new("user", "ping")]);
        assert_eq!(session.quick_send("  ").await, None);
    }

    #[tokio::test]
    async fn test_quick_send_failure_is_none() {
        let mut transport = MockTransport::streaming(vec![]);
        transport.reply = Err(SessionError::DecodeFailure("bad shape".to_string()));
        let (session, _) = open_session(transport, MockStore::default()).await;

        assert_eq!(session.quick_send("hi").await, None);
        assert_eq!(session.last_error(), None);
    }

    #[tokio::test]
    async fn test_check_gateway_connection() {
        let (mut session, feedback) =
            open_session(MockTransport::streaming(vec![]), MockStore::default()).await;
        assert!(session.check_gateway_connection().await);
        assert_eq!(feedback.signals(), vec![Feedback::Connected]);

        session.transport.healthy = false;
        let mut rx = session.subscribe();
        assert!(!session.check_gateway_connection().await);
        assert!(!session.is_reachable());
        assert_eq!(feedback.signals(), vec![Feedback::Connected]);
        assert_eq!(
            drain(&mut rx),
            vec![SessionEvent::ReachabilityChanged { reachable: false }]
        );

        session.transport.healthy = true;
        assert!(session.check_gateway_connection().await);
        assert!(session.is_reachable());
    }
}
