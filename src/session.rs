//! Chat session orchestration
//!
//! A [`ChatSession`] ties together the conversation store, a provider
//! handle, and the per-turn model configuration. Submitting a turn follows
//! a fixed sequence: snapshot the store, append the user message, send the
//! snapshot plus the new input through the provider boundary, append
//! whatever comes back (success or error).
//!
//! The session expects turns to be serialized by the caller: the history
//! projection reads a full store snapshot, so a second submission before
//! the first resolves would duplicate or reorder turns. The interactive
//! REPL satisfies this naturally by awaiting each turn.

use crate::attachment::Attachment;
use crate::config::ModelConfig;
use crate::conversation::{Conversation, UsageTotals};
use crate::error::{NexusError, Result};
use crate::message::ChatMessage;
use crate::providers::{send_message, ChatProvider};

/// An in-memory chat session over one provider
pub struct ChatSession {
    conversation: Conversation,
    provider: Box<dyn ChatProvider>,
    config: ModelConfig,
}

impl ChatSession {
    /// Creates a session with an empty conversation
    ///
    /// # Arguments
    ///
    /// * `provider` - The provider handle used for every turn
    /// * `config` - Initial per-turn configuration; adjustable between turns
    pub fn new(provider: Box<dyn ChatProvider>, config: ModelConfig) -> Self {
        Self {
            conversation: Conversation::new(),
            provider,
            config,
        }
    }

    /// Submits one turn and returns the resulting model message
    ///
    /// The provider receives a snapshot of the history taken *before* the
    /// new user message is appended, plus the new input separately, so the
    /// new turn appears exactly once in the request. The returned message
    /// is error-flagged when the provider call failed; this method itself
    /// never fails.
    pub async fn submit_turn(&mut self, text: &str, attachments: Vec<Attachment>) -> &ChatMessage {
        let snapshot = self.conversation.snapshot();
        tracing::debug!(
            "Submitting turn: {} chars, {} attachments, {} prior messages",
            text.len(),
            attachments.len(),
            snapshot.len()
        );

        self.conversation
            .append(ChatMessage::user(text, attachments.clone()));

        let reply = send_message(
            self.provider.as_ref(),
            &snapshot,
            text,
            &attachments,
            &self.config,
        )
        .await;

        self.conversation.append(reply)
    }

    /// The conversation store
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The current per-turn configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Running usage totals for the session
    pub fn usage_totals(&self) -> UsageTotals {
        self.conversation.usage_totals()
    }

    /// Switches the model for subsequent turns
    pub fn set_model(&mut self, name: impl Into<String>) {
        self.config.model_name = name.into();
        tracing::info!("Switched model to {}", self.config.model_name);
    }

    /// Sets the sampling temperature for subsequent turns
    ///
    /// # Errors
    ///
    /// Returns `NexusError::Config` when the value is outside `[0.0, 1.0]`;
    /// out-of-range values must never reach the request builder.
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(NexusError::Config(format!(
                "temperature must be within [0.0, 1.0], got {}",
                temperature
            ))
            .into());
        }
        self.config.temperature = temperature;
        Ok(())
    }

    /// Enables or disables search grounding for subsequent turns
    pub fn set_search(&mut self, enabled: bool) {
        self.config.use_search = enabled;
    }

    /// Enables or disables thinking for subsequent turns
    pub fn set_thinking(&mut self, enabled: bool) {
        self.config.use_thinking = enabled;
    }

    /// Sets the thinking budget for subsequent turns
    ///
    /// A budget of zero suppresses the thinking directive even when
    /// thinking is enabled.
    pub fn set_thinking_budget(&mut self, budget: u32) {
        self.config.thinking_budget = budget;
    }

    /// Clears the conversation (caller-level reset)
    pub fn clear(&mut self) {
        self.conversation.clear();
    }
}
