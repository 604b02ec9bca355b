//! Interactive chat session handler
//!
//! Runs a readline-based loop over a [`ChatSession`]. Slash commands
//! adjust the session in place; anything else is submitted as a turn with
//! whatever attachments were staged since the previous send. The loop
//! awaits each turn before reading the next line, which keeps a single
//! request in flight at a time.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::attachment::Attachment;
use crate::cli::GenerationArgs;
use crate::commands::special_commands::{
    parse_special_command, print_help, SpecialCommand, ThinkingToggle,
};
use crate::commands::{apply_generation_args, models};
use crate::config::Config;
use crate::conversation::UsageTotals;
use crate::error::Result;
use crate::message::ChatMessage;
use crate::providers::create_provider;
use crate::session::ChatSession;

/// Start an interactive chat session
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `generation` - CLI overrides for the per-turn settings
///
/// # Errors
///
/// Returns an error when credentials are missing or the overridden
/// configuration is invalid. Provider failures during the session never
/// surface as errors; they appear as error-flagged replies.
pub async fn run_chat(config: Config, generation: GenerationArgs) -> Result<()> {
    tracing::info!("Starting interactive chat session");

    let mut model_config = config.generation.clone();
    apply_generation_args(&mut model_config, &generation);
    model_config.validate()?;

    let provider = create_provider(&config.provider)?;
    let mut session = ChatSession::new(provider, model_config);

    let mut rl = DefaultEditor::new()?;
    let mut staged: Vec<Attachment> = Vec::new();

    print_welcome_banner(&session);

    loop {
        let prompt = format_prompt(&session, staged.len());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_special_command(trimmed) {
                    SpecialCommand::Help => {
                        print_help();
                        continue;
                    }
                    SpecialCommand::Status => {
                        print_status(&session, staged.len());
                        continue;
                    }
                    SpecialCommand::Usage => {
                        print_usage_totals(session.usage_totals());
                        continue;
                    }
                    SpecialCommand::Models => {
                        models::print_models_table();
                        continue;
                    }
                    SpecialCommand::Clear => {
                        session.clear();
                        staged.clear();
                        println!("Conversation cleared\n");
                        continue;
                    }
                    SpecialCommand::Attach(path) => {
                        stage_attachment(&mut staged, &path, config.chat.max_attachment_bytes);
                        continue;
                    }
                    SpecialCommand::Model(name) => {
                        session.set_model(name);
                        println!("Model set to {}\n", session.config().model_name);
                        continue;
                    }
                    SpecialCommand::Temperature(value) => {
                        match session.set_temperature(value) {
                            Ok(()) => println!("Temperature set to {}\n", value),
                            Err(e) => eprintln!("{}\n", format!("{}", e).red()),
                        }
                        continue;
                    }
                    SpecialCommand::Search(enabled) => {
                        session.set_search(enabled);
                        println!(
                            "Search grounding {}\n",
                            if enabled { "enabled" } else { "disabled" }
                        );
                        continue;
                    }
                    SpecialCommand::Thinking(toggle) => {
                        match toggle {
                            ThinkingToggle::On => session.set_thinking(true),
                            ThinkingToggle::Off => session.set_thinking(false),
                            ThinkingToggle::Budget(budget) => {
                                session.set_thinking(true);
                                session.set_thinking_budget(budget);
                            }
                        }
                        let current = session.config();
                        println!(
                            "Thinking {} (budget {})\n",
                            if current.use_thinking { "enabled" } else { "disabled" },
                            current.thinking_budget
                        );
                        continue;
                    }
                    SpecialCommand::Invalid(hint) => {
                        eprintln!("{}\n", hint.yellow());
                        continue;
                    }
                    SpecialCommand::Exit => break,
                    SpecialCommand::None => {
                        // Regular prompt; fall through to submission.
                    }
                }

                let attachments = std::mem::take(&mut staged);
                let reply = session.submit_turn(trimmed, attachments).await;
                render_reply(reply, config.chat.show_usage);
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Encode a file and add it to the staged attachments
fn stage_attachment(staged: &mut Vec<Attachment>, path: &str, max_bytes: u64) {
    match Attachment::from_path(std::path::Path::new(path), max_bytes) {
        Ok(attachment) => {
            println!("Staged {} ({})\n", path, attachment.describe());
            staged.push(attachment);
        }
        Err(e) => {
            // Encoding failure is local-only: warn and move on, nothing
            // enters the conversation.
            tracing::warn!("Failed to encode attachment {}: {}", path, e);
            eprintln!("{}\n", format!("Could not attach {}: {}", path, e).yellow());
        }
    }
}

/// Renders a model reply: body, citations, and the usage footer
pub(crate) fn render_reply(message: &ChatMessage, show_usage: bool) {
    if message.is_error {
        eprintln!("\n{}\n", message.text.red());
        return;
    }

    println!("\n{}", message.text);

    if let Some(metadata) = &message.metadata {
        if let Some(chunks) = &metadata.grounding_chunks {
            println!("\n{}", "Sources:".cyan());
            for (idx, chunk) in chunks.iter().enumerate() {
                if let Some(web) = &chunk.web {
                    println!("  {}. {} <{}>", idx + 1, web.title, web.uri);
                }
            }
        }
        if show_usage {
            if let Some(usage) = metadata.usage {
                println!(
                    "{}",
                    format!(
                        "tokens: prompt {}, candidates {}, total {}",
                        usage.prompt_tokens, usage.candidates_tokens, usage.total_tokens
                    )
                    .dimmed()
                );
            }
        }
    }
    println!();
}

fn format_prompt(session: &ChatSession, staged: usize) -> String {
    let mut tags = String::new();
    if session.config().use_search {
        tags.push_str(&format!("[{}]", "search".green()));
    }
    if session.config().use_thinking {
        tags.push_str(&format!("[{}]", "thinking".purple()));
    }
    if staged > 0 {
        tags.push_str(&format!("[{} staged]", staged));
    }
    format!("{}{}> ", "nexus".bold(), tags)
}

fn print_welcome_banner(session: &ChatSession) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Nexus - Gemini in your terminal              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Model: {}", session.config().model_name.cyan());
    println!("Type '/help' for available commands, 'exit' to quit\n");
}

fn print_status(session: &ChatSession, staged: usize) {
    let config = session.config();
    println!("\nModel:              {}", config.model_name);
    println!("Temperature:        {}", config.temperature);
    println!(
        "Search grounding:   {}",
        if config.use_search { "on" } else { "off" }
    );
    println!(
        "Thinking:           {} (budget {})",
        if config.use_thinking { "on" } else { "off" },
        config.thinking_budget
    );
    println!("Messages:           {}", session.conversation().len());
    println!("Staged attachments: {}\n", staged);
}

fn print_usage_totals(totals: UsageTotals) {
    if totals.reported_turns == 0 {
        println!("\nNo token usage reported yet\n");
        return;
    }
    println!("\nPrompt tokens:     {}", totals.prompt_tokens);
    println!("Candidate tokens:  {}", totals.candidates_tokens);
    println!("Total tokens:      {}", totals.total_tokens);
    println!("Reported turns:    {}\n", totals.reported_turns);
}
