//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::{ArtifactGenerator, Responder};
use super::BotRuntime;
use crate::cache::ArtifactCache;
use crate::qr::GenerateError;
use crate::state_machine::ChatId;
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Responder
// ============================================================================

/// Records every outbound message instead of sending it.
#[derive(Default)]
pub struct MockResponder {
    pub texts: Mutex<Vec<(ChatId, String)>>,
    pub prompts: Mutex<Vec<(ChatId, String)>>,
    pub artifacts: Mutex<Vec<(ChatId, Vec<u8>, String)>>,
}

impl MockResponder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn texts(&self) -> Vec<(ChatId, String)> {
        self.texts.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<(ChatId, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn artifacts(&self) -> Vec<(ChatId, Vec<u8>, String)> {
        self.artifacts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.texts.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_size_prompt(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.prompts
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_artifact(
        &self,
        chat_id: ChatId,
        png: &[u8],
        caption: &str,
    ) -> Result<(), TelegramError> {
        self.artifacts
            .lock()
            .unwrap()
            .push((chat_id, png.to_vec(), caption.to_string()));
        Ok(())
    }
}

// ============================================================================
// Mock Generator
// ============================================================================

/// Generator returning queued results, falling back to deterministic
/// bytes derived from (url, pixel). Records every invocation.
#[derive(Default)]
pub struct MockGenerator {
    results: Mutex<VecDeque<Result<Vec<u8>, GenerateError>>>,
    pub calls: Mutex<Vec<(String, u32)>>,
}

impl MockGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue_failure(&self) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(GenerateError::Encode("mock failure".to_string())));
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactGenerator for MockGenerator {
    async fn generate(&self, url: &str, pixel: u32) -> Result<Vec<u8>, GenerateError> {
        self.calls.lock().unwrap().push((url.to_string(), pixel));
        if let Some(queued) = self.results.lock().unwrap().pop_front() {
            return queued;
        }
        Ok(format!("png:{url}:{pixel}").into_bytes())
    }
}

// ============================================================================
// Integration tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::transition::{
        CAPTION_CACHED, CAPTION_FRESH, CHOOSE_SIZE, GENERATION_FAILED, INVALID_CHOICE,
        INVALID_LINK, NO_PENDING,
    };
    use crate::state_machine::Event;

    type MockRuntime = BotRuntime<Arc<MockResponder>, Arc<MockGenerator>>;

    fn runtime(
        responder: &Arc<MockResponder>,
        generator: &Arc<MockGenerator>,
    ) -> MockRuntime {
        BotRuntime::new(
            Arc::clone(responder),
            Arc::clone(generator),
            Arc::new(ArtifactCache::new(1024 * 1024)),
        )
    }

    fn text(s: &str) -> Event {
        Event::Text {
            text: s.to_string(),
        }
    }

    fn select(token: &str) -> Event {
        Event::SizeSelected {
            token: token.to_string(),
        }
    }

    /// Poll until `cond` holds; effects are executed asynchronously by the
    /// chat runtime tasks, so tests have to wait for them.
    async fn wait_until(cond: impl Fn() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not met within timeout");
    }

    #[tokio::test]
    async fn url_then_selection_delivers_and_resets() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(7, text("example.com")).await;
        wait_until(|| !responder.prompts().is_empty()).await;
        assert_eq!(responder.prompts(), vec![(7, CHOOSE_SIZE.to_string())]);

        bot.dispatch(7, select("medium")).await;
        wait_until(|| !responder.artifacts().is_empty()).await;

        assert_eq!(generator.calls(), vec![("https://example.com".to_string(), 250)]);
        let artifacts = responder.artifacts();
        assert_eq!(artifacts[0].0, 7);
        assert_eq!(artifacts[0].2, CAPTION_FRESH);

        // Pending cleared: another selection now asks for a URL.
        bot.dispatch(7, select("large")).await;
        wait_until(|| !responder.texts().is_empty()).await;
        assert_eq!(responder.texts(), vec![(7, NO_PENDING.to_string())]);
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn selection_without_url_asks_for_one() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, select("large")).await;
        wait_until(|| !responder.texts().is_empty()).await;

        assert_eq!(responder.texts(), vec![(1, NO_PENDING.to_string())]);
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_without_generation() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, text("example.com")).await;
        bot.dispatch(1, select("huge")).await;
        wait_until(|| !responder.texts().is_empty()).await;

        assert_eq!(responder.texts(), vec![(1, INVALID_CHOICE.to_string())]);
        assert!(generator.calls().is_empty());

        // The pending URL survived the bad selection.
        bot.dispatch(1, select("small")).await;
        wait_until(|| !responder.artifacts().is_empty()).await;
        assert_eq!(generator.calls(), vec![("https://example.com".to_string(), 150)]);
    }

    #[tokio::test]
    async fn invalid_text_is_rejected() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, text("definitely not a url")).await;
        wait_until(|| !responder.texts().is_empty()).await;

        assert_eq!(responder.texts(), vec![(1, INVALID_LINK.to_string())]);
        assert!(responder.prompts().is_empty());
    }

    #[tokio::test]
    async fn newer_url_supersedes_older_one() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, text("a.com")).await;
        bot.dispatch(1, text("b.com")).await;
        bot.dispatch(1, select("small")).await;
        wait_until(|| !responder.artifacts().is_empty()).await;

        assert_eq!(generator.calls(), vec![("https://b.com".to_string(), 150)]);
    }

    #[tokio::test]
    async fn failure_keeps_pending_and_allows_retry() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        generator.queue_failure();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, text("example.com")).await;
        bot.dispatch(1, select("medium")).await;
        wait_until(|| !responder.texts().is_empty()).await;
        assert_eq!(responder.texts(), vec![(1, GENERATION_FAILED.to_string())]);
        assert!(responder.artifacts().is_empty());

        // Failure was not cached; reselecting retries and succeeds.
        bot.dispatch(1, select("medium")).await;
        wait_until(|| !responder.artifacts().is_empty()).await;
        assert_eq!(generator.calls().len(), 2);
        assert_eq!(responder.artifacts()[0].2, CAPTION_FRESH);
    }

    #[tokio::test]
    async fn identical_requests_share_one_generation() {
        let responder = MockResponder::new();
        let generator = MockGenerator::new();
        let bot = runtime(&responder, &generator);

        bot.dispatch(1, text("example.com")).await;
        bot.dispatch(1, select("medium")).await;
        wait_until(|| responder.artifacts().len() == 1).await;

        bot.dispatch(2, text("example.com")).await;
        bot.dispatch(2, select("medium")).await;
        wait_until(|| responder.artifacts().len() == 2).await;

        // Second chat hit the cache: one generator call, identical bytes,
        // cached caption.
        assert_eq!(generator.calls().len(), 1);
        let artifacts = responder.artifacts();
        assert_eq!(artifacts[0].1, artifacts[1].1);
        assert_eq!(artifacts[1].2, CAPTION_CACHED);
    }
}
