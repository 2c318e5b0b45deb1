//! Pure state transition function
//!
//! Given the same state and event this always produces the same new
//! state and effects, with no I/O. Invalid input (bad URLs, unknown size
//! tokens, selections with nothing pending) is not an error here: each
//! produces a user-visible reply effect and leaves the state untouched.

use super::{ChatContext, ChatState, Effect, Event, GenerationOutcome};
use crate::size::SizeToken;
use crate::url::{is_valid_url, normalize_url};

pub(crate) const GREETING: &str =
    "👋 Hi! Send me a link (URL) and I'll turn it into a QR code.";
pub(crate) const HELP: &str =
    "Send a URL (like example.com), then pick a size. I'll reply with a scannable QR code.";
pub(crate) const INVALID_LINK: &str =
    "⚠️ That doesn't look like a valid link. Please send a real URL.";
pub(crate) const CHOOSE_SIZE: &str = "📏 Pick a QR code size:";
pub(crate) const INVALID_CHOICE: &str = "⚠️ Unknown size choice. Please pick again.";
pub(crate) const NO_PENDING: &str = "⚠️ Please send a URL first.";
pub(crate) const GENERATION_FAILED: &str =
    "❌ Something went wrong generating your QR code. Please try again.";
pub(crate) const CAPTION_FRESH: &str = "✅ Here's your QR code!";
pub(crate) const CAPTION_CACHED: &str = "📌 Here's your QR code!";

/// Result of a state transition.
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function.
pub fn transition(state: &ChatState, _context: &ChatContext, event: Event) -> TransitionResult {
    match event {
        // ============================================================
        // Commands
        // ============================================================

        // Commands never touch conversation state.
        Event::Command { name } => {
            let result = TransitionResult::new(state.clone());
            match name.as_str() {
                "start" => result.with_effect(Effect::reply(GREETING)),
                "help" => result.with_effect(Effect::reply(HELP)),
                _ => result,
            }
        }

        // ============================================================
        // Free text: URL intake
        // ============================================================

        Event::Text { text } => {
            if !is_valid_url(&text) {
                return TransitionResult::new(state.clone())
                    .with_effect(Effect::reply(INVALID_LINK));
            }
            // A new valid URL silently supersedes any pending one.
            TransitionResult::new(ChatState::AwaitingSize {
                url: normalize_url(&text),
            })
            .with_effect(Effect::prompt_size(CHOOSE_SIZE))
        }

        // ============================================================
        // Size selection
        // ============================================================

        Event::SizeSelected { token } => {
            let Some(size) = SizeToken::parse(&token) else {
                return TransitionResult::new(state.clone())
                    .with_effect(Effect::reply(INVALID_CHOICE));
            };
            match state.pending_url() {
                None => {
                    TransitionResult::new(ChatState::Idle).with_effect(Effect::reply(NO_PENDING))
                }
                // Pending URL stays in place until delivery succeeds, so a
                // failed generation can be retried by reselecting a size.
                Some(url) => TransitionResult::new(state.clone())
                    .with_effect(Effect::generate(url, size.pixel_size())),
            }
        }

        // ============================================================
        // Generation completion
        // ============================================================

        Event::Generated { url, outcome } => match outcome {
            GenerationOutcome::Success(artifact) => {
                let caption = if artifact.from_cache {
                    CAPTION_CACHED
                } else {
                    CAPTION_FRESH
                };
                // Only clear the pending URL the artifact was made for; a
                // URL that superseded it mid-generation stays pending.
                let new_state = if state.pending_url() == Some(url.as_str()) {
                    ChatState::Idle
                } else {
                    state.clone()
                };
                TransitionResult::new(new_state)
                    .with_effect(Effect::send_artifact(artifact, caption))
            }
            GenerationOutcome::Failed => TransitionResult::new(state.clone())
                .with_effect(Effect::reply(GENERATION_FAILED)),
        },
    }
}
