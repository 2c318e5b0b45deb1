//! Effects produced by state transitions

use crate::cache::Artifact;

/// Effects to be executed after a state transition.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Send a plain text message to the chat.
    Reply { text: String },

    /// Send the size prompt with the three selectable options.
    PromptSize { text: String },

    /// Start artifact generation (spawned as a background task).
    Generate { url: String, pixel: u32 },

    /// Deliver a rendered artifact with its caption.
    SendArtifact { artifact: Artifact, caption: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply { text: text.into() }
    }

    pub fn prompt_size(text: impl Into<String>) -> Self {
        Effect::PromptSize { text: text.into() }
    }

    pub fn generate(url: impl Into<String>, pixel: u32) -> Self {
        Effect::Generate {
            url: url.into(),
            pixel,
        }
    }

    pub fn send_artifact(artifact: Artifact, caption: impl Into<String>) -> Self {
        Effect::SendArtifact {
            artifact,
            caption: caption.into(),
        }
    }
}
