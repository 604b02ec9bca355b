//! Command-line interface definition for Nexus
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot prompts, model
//! listing, and API key management.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Nexus - terminal chat client for Google Gemini
///
/// Converse with Gemini from the terminal, with image attachments,
/// web-grounded search, and extended thinking.
#[derive(Parser, Debug, Clone)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Per-turn generation flags shared by `chat` and `ask`
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Override the configured model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the sampling temperature (0.0 - 1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Enable web-grounded search
    #[arg(long)]
    pub search: bool,

    /// Enable extended thinking
    #[arg(long)]
    pub thinking: bool,

    /// Thinking budget in tokens (implies --thinking)
    #[arg(long)]
    pub thinking_budget: Option<u32>,
}

/// Available commands for Nexus
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Send a single prompt and print the reply
    Ask {
        /// The prompt text
        prompt: String,

        /// Attach an image file (repeatable)
        #[arg(short, long)]
        attach: Vec<PathBuf>,

        /// Print the full reply message as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// List known Gemini models
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the Gemini API key
    Auth {
        /// Key management subcommand
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// API key management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Store an API key in the OS keyring
    Set {
        /// The API key; prompted for interactively when omitted
        api_key: Option<String>,
    },

    /// Show where the current key comes from
    Status,

    /// Remove the stored API key from the OS keyring
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
