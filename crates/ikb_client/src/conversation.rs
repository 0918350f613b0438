//! Conversation controller: append-only message log, input buffer and the
//! pending flag that keeps at most one chat request in flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{ChatService, ServiceFailure};
use crate::messages::{ChatReply, ChatRequest};

/// Appended when the service replies without any text.
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't process that request.";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the conversation. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    text: String,
    sender: Sender,
    created_at: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered, append-only record of one session's messages.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<Message>,
}

impl ConversationLog {
    fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Entries appended at or after `index`; empty when `index` is past the end.
    pub fn since(&self, index: usize) -> &[Message] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already in flight; nothing changed.
    Ignored,
    /// The service replied (possibly with the fallback text).
    Replied,
    /// The failure was recorded as an assistant message.
    Failed(ServiceFailure),
}

/// Owns one session's conversation state.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    log: ConversationLog,
    input: String,
    pending: bool,
}

impl Controller {
    /// Empty log, empty input, nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log seeded with a single assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut controller = Self::new();
        controller.log.push(Message::new(Sender::Assistant, greeting));
        controller
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether the send action is enabled.
    pub fn can_send(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }

    /// Submit the current input buffer.
    pub async fn send<S>(&mut self, service: &S) -> SubmitOutcome
    where
        S: ChatService + ?Sized,
    {
        let text = self.input.clone();
        self.submit(service, &text).await
    }

    /// Append `text` as a user message, ask `service`, and append its reply or
    /// the failure text. The pending flag is cleared even if the returned
    /// future is dropped before the service answers.
    pub async fn submit<S>(&mut self, service: &S, text: &str) -> SubmitOutcome
    where
        S: ChatService + ?Sized,
    {
        let Some(request) = self.begin(text) else {
            return SubmitOutcome::Ignored;
        };
        let in_flight = InFlight { controller: self };
        let result = service.send(&request).await;
        in_flight.finish(result)
    }

    /// First half of a submission: record the user message, clear the input
    /// and mark the request pending. Returns the request to dispatch, or
    /// `None` when the input is blank or a request is already pending.
    pub fn begin(&mut self, text: &str) -> Option<ChatRequest> {
        if self.pending {
            debug!("submission ignored: request already pending");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }
        self.log.push(Message::new(Sender::User, text));
        self.input.clear();
        self.pending = true;
        debug!(entries = self.log.len(), "chat request dispatched");
        Some(ChatRequest::new(text))
    }

    /// Second half of a submission: append the assistant message for `result`
    /// and clear the pending flag. Ignored when nothing is pending.
    pub fn resolve(&mut self, result: Result<ChatReply, ServiceFailure>) -> SubmitOutcome {
        if !self.pending {
            warn!("resolve called with no request pending");
            return SubmitOutcome::Ignored;
        }
        let (text, outcome) = match result {
            Ok(reply) => (
                reply
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
                SubmitOutcome::Replied,
            ),
            Err(failure) => (failure.user_text(), SubmitOutcome::Failed(failure)),
        };
        self.log.push(Message::new(Sender::Assistant, text));
        self.pending = false;
        debug!(entries = self.log.len(), ?outcome, "chat request resolved");
        outcome
    }
}

/// Borrow of a controller with a request outstanding. Dropping it
/// unresolved (cancelled future, panic in the service) releases the flag.
struct InFlight<'a> {
    controller: &'a mut Controller,
}

impl InFlight<'_> {
    fn finish(self, result: Result<ChatReply, ServiceFailure>) -> SubmitOutcome {
        self.controller.resolve(result)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.controller.pending {
            warn!("chat request dropped before it resolved");
            self.controller.pending = false;
        }
    }
}
