//! Minimal Telegram Bot API surface
//!
//! The bot only needs long polling, plain messages, inline keyboards,
//! and photo upload, so this stays a thin client over the HTTP API
//! rather than a full framework.

mod client;
pub mod types;

pub use client::{TelegramClient, TelegramError};

use crate::size::SizeToken;
use types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// The size-selection keyboard: one button per row, one row per token.
pub fn size_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: SizeToken::ALL
            .iter()
            .map(|token| {
                vec![InlineKeyboardButton {
                    text: token.label().to_string(),
                    callback_data: token.as_str().to_string(),
                }]
            })
            .collect(),
    }
}
