//! Inbound update classification
//!
//! Maps raw Telegram updates onto the tagged event set the state machine
//! understands. Non-text messages become empty `Text` events, which fail
//! URL validation downstream; updates with no routable chat are dropped.

use crate::state_machine::{ChatId, Event};
use crate::telegram::types::Update;

/// A classified inbound event, addressed to its chat.
#[derive(Debug)]
pub struct Inbound {
    pub chat_id: ChatId,
    pub event: Event,
}

pub fn classify_update(update: Update) -> Option<Inbound> {
    if let Some(callback) = update.callback_query {
        let chat_id = callback.message?.chat.id;
        return Some(Inbound {
            chat_id,
            event: Event::SizeSelected {
                token: callback.data.unwrap_or_default(),
            },
        });
    }

    let message = update.message?;
    let chat_id = message.chat.id;
    let text = message.text.unwrap_or_default();
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix('/') {
        let name = rest
            .split(|c: char| c.is_whitespace() || c == '@')
            .next()
            .unwrap_or_default()
            .to_string();
        return Some(Inbound {
            chat_id,
            event: Event::Command { name },
        });
    }

    Some(Inbound {
        chat_id,
        event: Event::Text {
            text: trimmed.to_string(),
        },
    })
}
