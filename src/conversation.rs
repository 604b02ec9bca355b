//! Conversation store with cumulative usage tracking
//!
//! This module implements the append-only message log backing a chat
//! session. The store never edits or removes individual messages: the full
//! history is replayed to the provider on every turn, so any mutation here
//! would silently rewrite what the model has already seen. Bulk [`clear`]
//! is the one reset operation, used by the interactive `/clear` command.
//!
//! [`clear`]: Conversation::clear

use crate::message::{ChatMessage, TokenUsage};

/// Running token totals across the session
///
/// Accumulated from the usage counters the provider reports per turn.
/// Turns where the provider omits the usage object contribute nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    /// Total prompt tokens across all reported turns
    pub prompt_tokens: u64,
    /// Total candidate tokens across all reported turns
    pub candidates_tokens: u64,
    /// Grand total across all reported turns
    pub total_tokens: u64,
    /// Number of turns that carried a usage object
    pub reported_turns: u32,
}

impl UsageTotals {
    fn accumulate(&mut self, usage: &TokenUsage) {
        self.prompt_tokens += u64::from(usage.prompt_tokens);
        self.candidates_tokens += u64::from(usage.candidates_tokens);
        self.total_tokens += u64::from(usage.total_tokens);
        self.reported_turns += 1;
    }
}

/// Append-only ordered log of chat messages
///
/// The core reads the store (history projection) and appends to it (user
/// turn, then model or error turn). Messages are immutable once appended.
///
/// # Examples
///
/// ```
/// use nexus::conversation::Conversation;
/// use nexus::message::ChatMessage;
///
/// let mut conversation = Conversation::new();
/// conversation.append(ChatMessage::user("Hello!", Vec::new()));
/// assert_eq!(conversation.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    usage_totals: UsageTotals,
}

impl Conversation {
    /// Creates an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns a reference to it
    ///
    /// Usage counters carried in the message's metadata are folded into the
    /// session totals.
    pub fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        if let Some(usage) = message.metadata.as_ref().and_then(|m| m.usage.as_ref()) {
            self.usage_totals.accumulate(usage);
        }
        self.messages.push(message);
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    /// All messages in append order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Owned copy of the current history
    ///
    /// Turn submission snapshots the store *before* appending the new user
    /// message, so the provider receives the prior history plus the new turn
    /// exactly once.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Number of messages in the store
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when the store holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recently appended message, if any
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Running usage totals for the session
    pub fn usage_totals(&self) -> UsageTotals {
        self.usage_totals
    }

    /// Removes all messages and resets usage totals
    ///
    /// This is a caller-level reset (the interactive `/clear` command), not
    /// a core operation; the core itself only ever appends.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing conversation ({} messages)", self.messages.len());
        self.messages.clear();
        self.usage_totals = UsageTotals::default();
    }
}
