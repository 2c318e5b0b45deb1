//! Events that can occur in a conversation

use crate::cache::Artifact;

/// Events that trigger state transitions.
///
/// Inbound Telegram updates are classified into the first three variants
/// at the ingest boundary; `Generated` is fed back by the runtime when a
/// spawned generation task completes.
#[derive(Debug, Clone)]
pub enum Event {
    /// `/`-prefixed text; `name` is the command without prefix or bot suffix.
    Command { name: String },

    /// Free text from the user (empty for non-text messages).
    Text { text: String },

    /// A size button was pressed; `token` is the raw callback payload.
    SizeSelected { token: String },

    /// A generation task finished for `url`.
    Generated {
        url: String,
        outcome: GenerationOutcome,
    },
}

/// Outcome of an artifact generation task.
///
/// Failures carry no detail here: the error is logged with full context
/// at the generation site, and the user only ever sees a generic message.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Success(Artifact),
    Failed,
}
