//! One-shot prompt handler
//!
//! Sends a single turn and prints the reply, for scripting and quick
//! questions. Attachment encoding failures are warned about and skipped;
//! a provider failure prints the error-flagged reply and exits nonzero.

use std::path::PathBuf;

use colored::Colorize;

use crate::attachment::Attachment;
use crate::cli::GenerationArgs;
use crate::commands::{apply_generation_args, chat::render_reply};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::session::ChatSession;

/// Send a single prompt and print the reply
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `prompt` - The prompt text
/// * `attach` - Image files to attach
/// * `json` - Print the full reply message as JSON instead of text
/// * `generation` - CLI overrides for the per-turn settings
///
/// # Errors
///
/// Returns an error when credentials are missing, the configuration is
/// invalid, or the provider call failed (so scripts observe a nonzero
/// exit status).
pub async fn run_ask(
    config: Config,
    prompt: String,
    attach: Vec<PathBuf>,
    json: bool,
    generation: GenerationArgs,
) -> Result<()> {
    let mut model_config = config.generation.clone();
    apply_generation_args(&mut model_config, &generation);
    model_config.validate()?;

    let mut attachments = Vec::new();
    for path in &attach {
        match Attachment::from_path(path, config.chat.max_attachment_bytes) {
            Ok(attachment) => attachments.push(attachment),
            Err(e) => {
                tracing::warn!("Failed to encode attachment {}: {}", path.display(), e);
                eprintln!(
                    "{}",
                    format!("Skipping {}: {}", path.display(), e).yellow()
                );
            }
        }
    }

    let provider = create_provider(&config.provider)?;
    let mut session = ChatSession::new(provider, model_config);

    let reply = session.submit_turn(&prompt, attachments).await;

    if json {
        println!("{}", serde_json::to_string_pretty(reply)?);
    } else {
        render_reply(reply, config.chat.show_usage);
    }

    if reply.is_error {
        anyhow::bail!("request failed");
    }
    Ok(())
}
