//! Chat message model
//!
//! This module defines the internal message representation shared by the
//! conversation store, the request builder, and the response normalizer.
//! Messages are immutable once created: the constructors here are the only
//! way to make one, and the conversation store only ever appends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// Role of a message within the conversation
///
/// Gemini's wire protocol knows `user` and `model` turns; `system` entries
/// never appear in the projected history and instead travel through the
/// request's dedicated system-instruction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message authored by the local user
    User,
    /// A message authored by the model (including synthesized error turns)
    Model,
    /// A system instruction entry; excluded from history projection
    System,
}

impl Role {
    /// Returns the wire-format string for this role
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::message::Role;
    ///
    /// assert_eq!(Role::User.as_str(), "user");
    /// assert_eq!(Role::Model.as_str(), "model");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Token usage counters reported by the provider for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt (the full replayed history)
    pub prompt_tokens: u32,
    /// Tokens produced by the candidates
    pub candidates_tokens: u32,
    /// Total tokens for the turn
    pub total_tokens: u32,
}

/// A web source backing a grounded statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// Resolved URI of the source page
    pub uri: String,
    /// Human-readable title of the source page
    pub title: String,
}

/// One grounding citation attached to a model reply
///
/// The provider may emit chunks without a `web` payload; those are carried
/// through unchanged so the citation list keeps its original length and order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web source details, when the chunk cites a web page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Provider metadata normalized onto a model reply
///
/// Both fields are optional and omitted entirely when the provider does not
/// report them; a missing usage object is never zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Token usage counters, when the provider reported a usage object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Grounding citations from the first candidate, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

impl ResponseMetadata {
    /// Returns `true` when neither usage nor grounding data is present
    pub fn is_empty(&self) -> bool {
        self.usage.is_none() && self.grounding_chunks.is_none()
    }
}

/// A single message in the conversation
///
/// Created once by the caller (user turns) or the response normalizer
/// (model and error turns) and never mutated afterwards. `id` is a v4 UUID,
/// unique within a session on a best-effort basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Session-unique identifier
    pub id: String,
    /// Author of the message
    pub role: Role,
    /// Plain-text body; never empty on a successful model turn
    pub text: String,
    /// Image attachments, in the order the user staged them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Creation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Set on model turns synthesized from a provider failure
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Provider metadata (usage, grounding), present on model turns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            attachments: Vec::new(),
            timestamp: Utc::now(),
            is_error: false,
            metadata: None,
        }
    }

    /// Creates a new user message with attachments
    ///
    /// # Arguments
    ///
    /// * `text` - The message text (may be empty when attachments carry the turn)
    /// * `attachments` - Encoded image attachments, in staging order
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::message::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Hello!", Vec::new());
    /// assert_eq!(msg.role, Role::User);
    /// assert!(!msg.is_error);
    /// ```
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        let mut message = Self::new(Role::User, text);
        message.attachments = attachments;
        message
    }

    /// Creates a new model message with optional provider metadata
    ///
    /// # Arguments
    ///
    /// * `text` - The reply text
    /// * `metadata` - Normalized usage/grounding metadata, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::message::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::model("Hi there", None);
    /// assert_eq!(msg.role, Role::Model);
    /// assert!(msg.metadata.is_none());
    /// ```
    pub fn model(text: impl Into<String>, metadata: Option<ResponseMetadata>) -> Self {
        let mut message = Self::new(Role::Model, text);
        message.metadata = metadata;
        message
    }

    /// Creates a new system message
    ///
    /// System entries are tolerated in the store but dropped during history
    /// projection; the fixed system instruction travels separately.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Creates an error-flagged model message
    ///
    /// Used by the response normalizer when the provider call fails; the
    /// conversation continues normally after an error turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::message::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::error("Error: connection refused");
    /// assert_eq!(msg.role, Role::Model);
    /// assert!(msg.is_error);
    /// ```
    pub fn error(text: impl Into<String>) -> Self {
        let mut message = Self::new(Role::Model, text);
        message.is_error = true;
        message
    }
}
