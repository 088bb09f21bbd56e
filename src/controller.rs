use crate::client::AnswerService;
use crate::store::KvStore;
use crate::transcript::{RequestToken, Transcript};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// The one message users see when anything goes wrong.
pub const ERROR_REPLY: &str = "Sorry, something went wrong. Please try again later.";

/// Namespace of the keys this client owns in the local store.
pub const OWNED_PREFIX: &str = "chat.";

const QUESTIONS_KEY: &str = "chat.questions-asked";

const MAX_MESSAGES: usize = 200;

/// Outcome of one finished request, tagged with the token of the
/// placeholder it belongs to.
struct ReplyEvent {
    token: RequestToken,
    reply: Result<String>,
}

/// Mediates between user input, the answer service, and the transcript.
///
/// Each submission spawns one independent request task; replies come back
/// over an in-process channel and are applied from the UI loop. A reply is
/// applied only if its token still owns a placeholder, so responses that
/// outlive a cleared conversation are dropped instead of resurfacing.
pub struct ChatController {
    transcript: Transcript,
    service: Arc<dyn AnswerService>,
    store: KvStore,
    reply_tx: UnboundedSender<ReplyEvent>,
    reply_rx: UnboundedReceiver<ReplyEvent>,
}

impl ChatController {
    pub fn new(service: Arc<dyn AnswerService>, store: KvStore) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            transcript: Transcript::new(MAX_MESSAGES),
            service,
            store,
            reply_tx,
            reply_rx,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Submit a question. Blank input is silently ignored; otherwise the
    /// user bubble and a typing placeholder are appended and one request is
    /// fired. Returns the token of the in-flight request.
    pub fn submit(&mut self, input: &str) -> Option<RequestToken> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }

        self.transcript.push_user(question.to_string());
        let token = RequestToken::new();
        self.transcript.push_placeholder(token);
        self.bump_question_count();

        let service = Arc::clone(&self.service);
        let reply_tx = self.reply_tx.clone();
        let question = question.to_string();
        tokio::spawn(async move {
            let reply = service.ask(&question).await;
            let _ = reply_tx.send(ReplyEvent { token, reply });
        });

        Some(token)
    }

    /// Drain finished requests and apply them to the transcript. Called
    /// once per UI tick.
    pub fn poll_replies(&mut self) {
        while let Ok(event) = self.reply_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Await the next finished request and apply it. Returns false once
    /// the channel is closed.
    #[allow(dead_code)]
    pub async fn recv_reply(&mut self) -> bool {
        match self.reply_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Start a fresh conversation. No server interaction, local store
    /// untouched.
    pub fn new_chat(&mut self) {
        self.transcript.clear();
    }

    /// Clear the conversation and the keys this client owns in the local
    /// store. Foreign keys survive.
    pub fn clear_chat(&mut self) -> Result<()> {
        self.transcript.clear();
        self.store.clear_prefix(OWNED_PREFIX)
    }

    pub fn questions_asked(&self) -> u64 {
        self.store
            .get(QUESTIONS_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    fn apply(&mut self, event: ReplyEvent) {
        let text = match event.reply {
            Ok(text) => text,
            Err(err) => {
                // Diagnostics go to the log; the user gets one fixed message.
                tracing::error!(error = %err, "answer request failed");
                ERROR_REPLY.to_string()
            }
        };

        if !self.transcript.resolve(event.token, text) {
            tracing::debug!("dropping reply for a cleared conversation");
        }
    }

    fn bump_question_count(&mut self) {
        let next = self.questions_asked() + 1;
        if let Err(err) = self.store.set(QUESTIONS_KEY, next.to_string()) {
            tracing::warn!(error = %err, "failed to update question counter");
        }
    }
}
