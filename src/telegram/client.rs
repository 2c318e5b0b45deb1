//! Telegram Bot API client

use super::types::{ApiResponse, InlineKeyboardMarkup, Message, Update};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// How much longer than the long-poll timeout a `getUpdates` call may
/// take before the HTTP layer gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Transport and API-level failures talking to Telegram.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Telegram API error: {0}")]
    Api(String),
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Long-poll for new updates, confirming everything before `offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });

        let response = self
            .client
            .post(format!("{}/getUpdates", self.base_url))
            .timeout(Duration::from_secs(timeout_secs) + POLL_GRACE)
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = json!({ "chat_id": chat_id, "text": text });
        let _: Message = self.call("sendMessage", &body).await?;
        Ok(())
    }

    pub async fn send_message_with_markup(
        &self,
        chat_id: i64,
        text: &str,
        markup: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "reply_markup": markup,
        });
        let _: Message = self.call("sendMessage", &body).await?;
        Ok(())
    }

    /// Upload a PNG artifact via multipart `sendPhoto`.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        png: Vec<u8>,
        caption: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part(
                "photo",
                Part::bytes(png).file_name("qr.png").mime_str("image/png")?,
            );
        if let Some(markup) = markup {
            form = form.text("reply_markup", serde_json::to_string(markup)?);
        }

        let response = self
            .client
            .post(format!("{}/sendPhoto", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let _: Message = Self::decode(response).await?;
        Ok(())
    }

    /// Acknowledge a button press so the client stops its spinner.
    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), TelegramError> {
        let body = json!({ "callback_query_id": callback_id });
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TelegramError> {
        let status = response.status();
        let body = response.text().await?;

        let api: ApiResponse<T> = serde_json::from_str(&body).map_err(|_| {
            let snippet: String = body.chars().take(200).collect();
            TelegramError::Api(format!("unexpected response ({status}): {snippet}"))
        })?;

        match (api.ok, api.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                api.description
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            )),
        }
    }
}
