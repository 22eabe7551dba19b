use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::task::JoinHandle;

use crate::api::ChatClient;

/// Fixed transcript text shown when a chat request fails, whatever the cause.
pub const ERRO_BACKEND: &str = "Erro ao conectar ao backend. Verifique se ele está rodando.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// A single transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

/// The conversation transcript plus the request coordinator.
///
/// The transcript is append-only and insertion-ordered. At most one request
/// is in flight at a time: `submit` rejects new questions while `loading`,
/// and `poll` folds the finished request back into the transcript as exactly
/// one bot message.
pub struct ChatSession {
    client: ChatClient,
    messages: Vec<Message>,
    next_id: u64,
    loading: bool,
    online: bool,
    task: Option<JoinHandle<Result<String>>>,
    probe: Option<JoinHandle<bool>>,
}

impl ChatSession {
    /// Create a session and fire the one-shot liveness probe. The probe is
    /// never repeated; its result only drives the online badge.
    pub fn new(client: ChatClient) -> Self {
        let probe_client = client.clone();
        let probe = tokio::spawn(async move { probe_client.health().await });

        Self {
            client,
            messages: Vec::new(),
            next_id: 0,
            loading: false,
            online: false,
            task: None,
            probe: Some(probe),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Submit a question. Whitespace-only input and submissions while a
    /// request is outstanding are ignored. Returns whether the transcript
    /// changed.
    pub fn submit(&mut self, input: &str) -> bool {
        let question = input.trim();
        if question.is_empty() || self.loading {
            return false;
        }

        self.push(Sender::User, question.to_string());
        self.loading = true;

        let client = self.client.clone();
        let question = question.to_string();
        self.task = Some(tokio::spawn(async move { client.ask(&question).await }));

        true
    }

    /// Fold a finished request into the transcript. Called from the UI tick;
    /// a no-op while the request is still running. Returns whether the
    /// transcript changed.
    pub async fn poll(&mut self) -> bool {
        if self.probe.as_ref().is_some_and(|probe| probe.is_finished()) {
            if let Some(probe) = self.probe.take() {
                self.online = probe.await.unwrap_or(false);
            }
        }

        if !self.task.as_ref().is_some_and(|task| task.is_finished()) {
            return false;
        }
        let Some(task) = self.task.take() else {
            return false;
        };

        let text = match task.await {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                log::warn!("chat request failed: {:#}", err);
                ERRO_BACKEND.to_string()
            }
            Err(err) => {
                log::error!("chat task aborted: {}", err);
                ERRO_BACKEND.to_string()
            }
        };

        self.push(Sender::Bot, text);
        self.loading = false;
        true
    }

    fn push(&mut self, sender: Sender, text: String) {
        self.messages.push(Message {
            id: self.next_id,
            text,
            sender,
            timestamp: Local::now(),
        });
        self.next_id += 1;
    }
}
