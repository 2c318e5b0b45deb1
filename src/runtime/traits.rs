//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::qr::GenerateError;
use crate::state_machine::ChatId;
use crate::telegram::{size_keyboard, TelegramClient, TelegramError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Outbound message delivery for a chat.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError>;

    /// Send a prompt carrying the three size choices.
    async fn send_size_prompt(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError>;

    /// Deliver a rendered artifact with a caption. The size choices are
    /// re-displayed on the delivery message.
    async fn send_artifact(
        &self,
        chat_id: ChatId,
        png: &[u8],
        caption: &str,
    ) -> Result<(), TelegramError>;
}

/// Producer of fresh artifact bytes.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    async fn generate(&self, url: &str, pixel: u32) -> Result<Vec<u8>, GenerateError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Responder + ?Sized> Responder for Arc<T> {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        (**self).send_text(chat_id, text).await
    }

    async fn send_size_prompt(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        (**self).send_size_prompt(chat_id, text).await
    }

    async fn send_artifact(
        &self,
        chat_id: ChatId,
        png: &[u8],
        caption: &str,
    ) -> Result<(), TelegramError> {
        (**self).send_artifact(chat_id, png, caption).await
    }
}

#[async_trait]
impl<T: ArtifactGenerator + ?Sized> ArtifactGenerator for Arc<T> {
    async fn generate(&self, url: &str, pixel: u32) -> Result<Vec<u8>, GenerateError> {
        (**self).generate(url, pixel).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter delivering responses through the Telegram Bot API.
pub struct TelegramResponder {
    client: Arc<TelegramClient>,
}

impl TelegramResponder {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Responder for TelegramResponder {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.client.send_message(chat_id, text).await
    }

    async fn send_size_prompt(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.client
            .send_message_with_markup(chat_id, text, &size_keyboard())
            .await
    }

    async fn send_artifact(
        &self,
        chat_id: ChatId,
        png: &[u8],
        caption: &str,
    ) -> Result<(), TelegramError> {
        self.client
            .send_photo(chat_id, png.to_vec(), caption, Some(&size_keyboard()))
            .await
    }
}

/// QR renderer running on the blocking pool with a bounded wait.
///
/// The timeout does not cancel the blocking render itself; it bounds how
/// long a conversation waits before reporting failure.
pub struct QrGenerator {
    timeout: Duration,
}

impl QrGenerator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ArtifactGenerator for QrGenerator {
    async fn generate(&self, url: &str, pixel: u32) -> Result<Vec<u8>, GenerateError> {
        let url = url.to_string();
        let render = tokio::task::spawn_blocking(move || crate::qr::render_qr_png(&url, pixel));
        match tokio::time::timeout(self.timeout, render).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(GenerateError::Task(join_err.to_string())),
            Err(_) => Err(GenerateError::TimedOut(self.timeout)),
        }
    }
}
