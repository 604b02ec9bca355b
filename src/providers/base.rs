//! Base provider trait and the message-sending boundary
//!
//! This module defines the ChatProvider trait that model providers
//! implement, the normalized reply type, and [`send_message`], the single
//! network-boundary operation. Everything below `send_message` may fail
//! with a normal `Result`; nothing above it ever sees an error, because
//! every failure path resolves to an error-flagged [`ChatMessage`].

use async_trait::async_trait;

use crate::attachment::Attachment;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::message::{ChatMessage, GroundingChunk, ResponseMetadata, TokenUsage};

/// Fallback body for a successful call that produced no text
///
/// An empty visible reply is worse than a placeholder, so a successful
/// turn's text is never left empty.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "No text response generated.";

/// A provider reply normalized out of the wire response
///
/// `usage` is present only when the provider reported a usage object at
/// all; it is never zero-filled from a missing object. `grounding_chunks`
/// is present only when the first candidate carried citations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    /// Reply text; may be empty here, the placeholder is applied at the
    /// message boundary
    pub text: String,
    /// Token usage counters, if reported
    pub usage: Option<TokenUsage>,
    /// Grounding citations from the first candidate, if present
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

impl ModelReply {
    /// Converts the reply into a chat message with a fresh id and timestamp
    ///
    /// Applies the empty-text placeholder and collapses empty metadata to
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::providers::{ModelReply, EMPTY_REPLY_PLACEHOLDER};
    ///
    /// let message = ModelReply::default().into_message();
    /// assert_eq!(message.text, EMPTY_REPLY_PLACEHOLDER);
    /// assert!(message.metadata.is_none());
    /// assert!(!message.is_error);
    /// ```
    pub fn into_message(self) -> ChatMessage {
        let text = if self.text.is_empty() {
            EMPTY_REPLY_PLACEHOLDER.to_string()
        } else {
            self.text
        };
        let metadata = ResponseMetadata {
            usage: self.usage,
            grounding_chunks: self.grounding_chunks,
        };
        let metadata = if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        };
        ChatMessage::model(text, metadata)
    }
}

/// Trait for model providers
///
/// `generate` is the only operation that suspends (network I/O) and the
/// only one permitted to fail. History projection and request building are
/// provider-internal pure transforms.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends one turn to the model: the full prior history plus the new
    /// user input, under the given per-turn configuration
    ///
    /// # Arguments
    ///
    /// * `history` - Snapshot of the conversation taken before the new
    ///   user message was appended
    /// * `new_text` - The new user input (may be empty when attachments
    ///   carry the turn)
    /// * `attachments` - Encoded attachments for the new turn
    /// * `config` - Per-turn capability configuration
    ///
    /// # Errors
    ///
    /// Returns an error on any network or protocol failure; callers go
    /// through [`send_message`], which converts errors into error-flagged
    /// messages.
    async fn generate(
        &self,
        history: &[ChatMessage],
        new_text: &str,
        attachments: &[Attachment],
        config: &ModelConfig,
    ) -> Result<ModelReply>;
}

/// Sends one turn and always returns a message
///
/// This is the boundary the rest of the application talks to: on success
/// the normalized reply becomes a model message, on failure a synthesized
/// error-flagged message embeds the failure reason. No error ever
/// propagates past this function, so callers need no error-handling branch.
///
/// A fresh `id` and `timestamp` are generated for the returned message
/// regardless of outcome.
pub async fn send_message(
    provider: &dyn ChatProvider,
    history: &[ChatMessage],
    new_text: &str,
    attachments: &[Attachment],
    config: &ModelConfig,
) -> ChatMessage {
    match provider.generate(history, new_text, attachments, config).await {
        Ok(reply) => reply.into_message(),
        Err(e) => {
            tracing::error!("Provider call failed: {:#}", e);
            ChatMessage::error(format!("Error: {}", e))
        }
    }
}
