//! Chat panel state: the message list and the one-request-at-a-time rule.

use serde::Serialize;

use super::ChatAssistant;
use crate::locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: MessageSender,
    pub text: String,
}

/// Messages shown in the chat panel. Opening the panel starts a fresh
/// conversation.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    open: bool,
    busy: bool,
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Shown while the transcript is empty.
    pub fn greeting(&self) -> Option<&'static str> {
        self.messages.is_empty().then_some(locale::ASSISTANT_GREETING)
    }

    pub fn open(&mut self) {
        if !self.open {
            self.messages.clear();
            self.busy = false;
        }
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    /// Records the user's message and marks the transcript busy.
    ///
    /// Returns the trimmed query to send, or `None` when the input is blank
    /// or a request is already in flight.
    pub fn begin_send(&mut self, input: &str) -> Option<String> {
        let query = input.trim();
        if query.is_empty() || self.busy {
            return None;
        }
        self.messages.push(ChatMessage {
            sender: MessageSender::User,
            text: query.to_string(),
        });
        self.busy = true;
        Some(query.to_string())
    }

    pub fn finish_send(&mut self, answer: String) {
        self.messages.push(ChatMessage {
            sender: MessageSender::Ai,
            text: answer,
        });
        self.busy = false;
    }

    /// Sends one message and appends the reply.
    pub async fn send(&mut self, assistant: &ChatAssistant, input: &str) -> Option<&ChatMessage> {
        let query = self.begin_send(input)?;
        let answer = assistant.answer(&query).await;
        self.finish_send(answer);
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::tests::StubBackend;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_send_appends_both_sides() {
        let assistant = ChatAssistant::new(Arc::new(StubBackend::replying("네, 맞아요.")));
        let mut transcript = ChatTranscript::new();
        transcript.open();
        assert_eq!(transcript.greeting(), Some(locale::ASSISTANT_GREETING));

        let reply = transcript.send(&assistant, "  체육복?  ").await.cloned();
        assert_eq!(reply.unwrap().text, "네, 맞아요.");
        assert_eq!(
            transcript.messages(),
            &[
                ChatMessage {
                    sender: MessageSender::User,
                    text: "체육복?".to_string()
                },
                ChatMessage {
                    sender: MessageSender::Ai,
                    text: "네, 맞아요.".to_string()
                },
            ]
        );
        assert!(transcript.greeting().is_none());
        assert!(!transcript.is_busy());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = Arc::new(StubBackend::replying("x"));
        let assistant = ChatAssistant::new(backend.clone());
        let mut transcript = ChatTranscript::new();
        assert!(transcript.send(&assistant, "   ").await.is_none());
        assert!(transcript.messages().is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_second_send_refused_while_busy() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.begin_send("first").is_some());
        assert!(transcript.begin_send("second").is_none());
        assert_eq!(transcript.messages().len(), 1);

        transcript.finish_send("answer".to_string());
        assert!(transcript.begin_send("second").is_some());
    }

    #[tokio::test]
    async fn test_failure_shows_apology() {
        let assistant = ChatAssistant::new(Arc::new(StubBackend::failing()));
        let mut transcript = ChatTranscript::new();
        let reply = transcript.send(&assistant, "급식?").await.cloned().unwrap();
        assert_eq!(reply.sender, MessageSender::Ai);
        assert_eq!(reply.text, locale::ASSISTANT_APOLOGY);
    }

    #[test]
    fn test_reopening_clears_history() {
        let mut transcript = ChatTranscript::new();
        assert!(transcript.toggle());
        transcript.begin_send("hello");
        transcript.finish_send("hi".to_string());
        assert!(!transcript.toggle());
        assert_eq!(transcript.messages().len(), 2);
        assert!(transcript.toggle());
        assert!(transcript.messages().is_empty());
    }
}
