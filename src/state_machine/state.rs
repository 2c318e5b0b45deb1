//! Conversation state types

/// Telegram chat identifier; scopes all conversation state.
pub type ChatId = i64;

/// Per-chat conversation state.
///
/// At most one pending URL exists per chat by construction: it lives
/// inside `AwaitingSize`, and a newer valid URL silently replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatState {
    /// No pending URL.
    #[default]
    Idle,

    /// A validated, normalized URL is waiting for a size selection.
    AwaitingSize { url: String },
}

impl ChatState {
    /// The URL awaiting a size selection, if any.
    pub fn pending_url(&self) -> Option<&str> {
        match self {
            ChatState::Idle => None,
            ChatState::AwaitingSize { url } => Some(url),
        }
    }
}

/// Context for a conversation (immutable configuration).
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub chat_id: ChatId,
}

impl ChatContext {
    pub fn new(chat_id: ChatId) -> Self {
        Self { chat_id }
    }
}
