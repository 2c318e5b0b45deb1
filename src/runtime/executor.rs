//! Chat runtime executor
//!
//! Owns one chat's state, applies pure transitions, and executes the
//! resulting effects. Generation runs as a spawned task whose completion
//! re-enters the machine as a `Generated` event, so a slow encode never
//! blocks this chat's event loop or any other chat.

use super::traits::{ArtifactGenerator, Responder};
use crate::cache::ArtifactCache;
use crate::state_machine::{
    transition, ChatContext, ChatState, Effect, Event, GenerationOutcome,
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct ChatRuntime<R, G>
where
    R: Responder + 'static,
    G: ArtifactGenerator + 'static,
{
    context: ChatContext,
    state: ChatState,
    responder: Arc<R>,
    generator: Arc<G>,
    cache: Arc<ArtifactCache>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
}

impl<R, G> ChatRuntime<R, G>
where
    R: Responder + 'static,
    G: ArtifactGenerator + 'static,
{
    pub fn new(
        context: ChatContext,
        state: ChatState,
        responder: Arc<R>,
        generator: Arc<G>,
        cache: Arc<ArtifactCache>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            context,
            state,
            responder,
            generator,
            cache,
            event_rx,
            event_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(chat_id = self.context.chat_id, "starting chat runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
        }

        tracing::debug!(chat_id = self.context.chat_id, "chat runtime stopped");
    }

    async fn process_event(&mut self, event: Event) {
        let result = transition(&self.state, &self.context, event);
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
    }

    /// Execute one effect. Delivery failures are logged and swallowed so
    /// the chat loop survives transport hiccups.
    async fn execute_effect(&mut self, effect: Effect) {
        let chat_id = self.context.chat_id;
        match effect {
            Effect::Reply { text } => {
                if let Err(e) = self.responder.send_text(chat_id, &text).await {
                    tracing::warn!(chat_id, error = %e, "failed to send reply");
                }
            }

            Effect::PromptSize { text } => {
                if let Err(e) = self.responder.send_size_prompt(chat_id, &text).await {
                    tracing::warn!(chat_id, error = %e, "failed to send size prompt");
                }
            }

            Effect::SendArtifact { artifact, caption } => {
                if let Err(e) = self
                    .responder
                    .send_artifact(chat_id, &artifact.bytes, &caption)
                    .await
                {
                    tracing::warn!(chat_id, error = %e, "failed to deliver artifact");
                }
            }

            Effect::Generate { url, pixel } => {
                let cache = Arc::clone(&self.cache);
                let generator = Arc::clone(&self.generator);
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    let gen = Arc::clone(&generator);
                    let gen_url = url.clone();
                    let outcome = match cache
                        .get_or_generate(&url, pixel, move || async move {
                            gen.generate(&gen_url, pixel).await
                        })
                        .await
                    {
                        Ok(artifact) => GenerationOutcome::Success(artifact),
                        Err(e) => {
                            tracing::error!(
                                chat_id,
                                url = %url,
                                pixel,
                                error = %e,
                                "artifact generation failed"
                            );
                            GenerationOutcome::Failed
                        }
                    };

                    // The runtime may have shut down; nothing to do then.
                    let _ = event_tx.send(Event::Generated { url, outcome }).await;
                });
            }
        }
    }
}
