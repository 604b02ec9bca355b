/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`   — Interactive chat session
- `ask`    — One-shot prompt
- `models` — Known-model catalog listing
- `auth`   — API key management

The handlers are intentionally small and use the library components:
session, providers, and attachment encoding.
*/

pub mod ask;
pub mod auth;
pub mod chat;
pub mod models;
pub mod special_commands;

use crate::cli::GenerationArgs;
use crate::config::ModelConfig;

/// Applies CLI generation flags on top of the configured defaults
///
/// `--thinking-budget` implies `--thinking`; the boolean flags only ever
/// enable a capability, they never switch a configured default off.
pub fn apply_generation_args(config: &mut ModelConfig, args: &GenerationArgs) {
    if let Some(model) = &args.model {
        config.model_name = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if args.search {
        config.use_search = true;
    }
    if args.thinking {
        config.use_thinking = true;
    }
    if let Some(budget) = args.thinking_budget {
        config.use_thinking = true;
        config.thinking_budget = budget;
    }
}
