//! Runtime for executing conversations
//!
//! One actor task per active chat, created on first event. Events for a
//! chat are serialized through its channel, so a pending URL can never be
//! read and cleared by two racing selections.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use traits::*;

use crate::cache::ArtifactCache;
use crate::state_machine::{ChatContext, ChatId, ChatState, Event};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Handle to interact with a running chat.
struct ChatHandle {
    event_tx: mpsc::Sender<Event>,
}

/// Manager for all chat runtimes.
pub struct BotRuntime<R, G>
where
    R: Responder + 'static,
    G: ArtifactGenerator + 'static,
{
    responder: Arc<R>,
    generator: Arc<G>,
    cache: Arc<ArtifactCache>,
    chats: RwLock<HashMap<ChatId, ChatHandle>>,
}

impl<R, G> BotRuntime<R, G>
where
    R: Responder + 'static,
    G: ArtifactGenerator + 'static,
{
    pub fn new(responder: R, generator: G, cache: Arc<ArtifactCache>) -> Self {
        Self {
            responder: Arc::new(responder),
            generator: Arc::new(generator),
            cache,
            chats: RwLock::new(HashMap::new()),
        }
    }

    /// Route an event to its chat's runtime, starting one if needed.
    pub async fn dispatch(&self, chat_id: ChatId, event: Event) {
        let event_tx = self.get_or_create(chat_id).await;
        if event_tx.send(event).await.is_err() {
            tracing::error!(chat_id, "chat runtime channel closed, event dropped");
        }
    }

    async fn get_or_create(&self, chat_id: ChatId) -> mpsc::Sender<Event> {
        {
            let chats = self.chats.read().await;
            if let Some(handle) = chats.get(&chat_id) {
                return handle.event_tx.clone();
            }
        }

        let mut chats = self.chats.write().await;
        // Re-check: another dispatcher may have won the write race.
        if let Some(handle) = chats.get(&chat_id) {
            return handle.event_tx.clone();
        }

        let (event_tx, event_rx) = mpsc::channel(32);
        let runtime = ChatRuntime::new(
            ChatContext::new(chat_id),
            ChatState::default(),
            Arc::clone(&self.responder),
            Arc::clone(&self.generator),
            Arc::clone(&self.cache),
            event_rx,
            event_tx.clone(),
        );
        tokio::spawn(runtime.run());

        chats.insert(
            chat_id,
            ChatHandle {
                event_tx: event_tx.clone(),
            },
        );
        event_tx
    }
}
