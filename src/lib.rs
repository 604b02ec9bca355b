//! Nexus - terminal chat client library for Google Gemini
//!
//! This library provides the core of the Nexus chat client: the
//! conversation-to-request compiler and response normalizer, plus the
//! supporting session, configuration, and credential layers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `message`: Immutable chat message model and response metadata
//! - `attachment`: Image encoding into provider-neutral attachments
//! - `conversation`: Append-only message store with usage totals
//! - `providers`: Provider abstraction, the Gemini implementation, and the
//!   non-throwing message boundary
//! - `session`: Turn orchestration over one conversation and provider
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use nexus::config::Config;
//! use nexus::providers::create_provider;
//! use nexus::session::ChatSession;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! config.validate()?;
//!
//! let provider = create_provider(&config.provider)?;
//! let mut session = ChatSession::new(provider, config.generation.clone());
//! let reply = session.submit_turn("Hello!", Vec::new()).await;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod attachment;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use attachment::Attachment;
pub use config::{Config, ModelConfig};
pub use conversation::Conversation;
pub use error::{NexusError, Result};
pub use message::{ChatMessage, Role};
pub use session::ChatSession;
