//! Slash-command parser for interactive chat
//!
//! Lines starting with `/` adjust the session instead of being sent to the
//! model: staging attachments, switching models, toggling search and
//! thinking, or inspecting session state. Plain `exit`/`quit` also ends
//! the session.

use colored::Colorize;

/// Thinking toggle argument: on, off, or a budget value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingToggle {
    /// Enable thinking with the current budget
    On,
    /// Disable thinking
    Off,
    /// Enable thinking and set the budget
    Budget(u32),
}

/// A parsed interactive command
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialCommand {
    /// `/help` - list available commands
    Help,
    /// `/status` - show session configuration and state
    Status,
    /// `/usage` - show cumulative token usage
    Usage,
    /// `/models` - list known models
    Models,
    /// `/clear` - reset the conversation
    Clear,
    /// `/exit`, `/quit`, `exit`, `quit` - end the session
    Exit,
    /// `/attach <path>` - stage an image for the next turn
    Attach(String),
    /// `/model <name>` - switch models
    Model(String),
    /// `/temp <value>` - set the sampling temperature
    Temperature(f32),
    /// `/search on|off` - toggle search grounding
    Search(bool),
    /// `/thinking on|off|<budget>` - toggle thinking
    Thinking(ThinkingToggle),
    /// A recognized command with bad arguments; carries the usage hint
    Invalid(String),
    /// Not a command; send the line to the model
    None,
}

/// Parses an input line into a special command
///
/// Returns [`SpecialCommand::None`] for regular prompts.
///
/// # Examples
///
/// ```
/// use nexus::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/help"), SpecialCommand::Help);
/// assert_eq!(
///     parse_special_command("/model gemini-3-pro-preview"),
///     SpecialCommand::Model("gemini-3-pro-preview".to_string())
/// );
/// assert_eq!(parse_special_command("hello there"), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> SpecialCommand {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return SpecialCommand::Exit;
    }

    let rest = match trimmed.strip_prefix('/') {
        Some(rest) => rest,
        None => return SpecialCommand::None,
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match (command.as_str(), arg) {
        ("help", _) => SpecialCommand::Help,
        ("status", _) => SpecialCommand::Status,
        ("usage", _) => SpecialCommand::Usage,
        ("models", _) => SpecialCommand::Models,
        ("clear", _) => SpecialCommand::Clear,
        ("exit" | "quit", _) => SpecialCommand::Exit,
        ("attach", Some(path)) => SpecialCommand::Attach(path.to_string()),
        ("attach", None) => SpecialCommand::Invalid("usage: /attach <path>".to_string()),
        ("model", Some(name)) => SpecialCommand::Model(name.to_string()),
        ("model", None) => SpecialCommand::Invalid("usage: /model <name>".to_string()),
        ("temp" | "temperature", Some(value)) => match value.parse::<f32>() {
            Ok(t) => SpecialCommand::Temperature(t),
            Err(_) => SpecialCommand::Invalid(format!("not a number: {}", value)),
        },
        ("temp" | "temperature", None) => {
            SpecialCommand::Invalid("usage: /temp <0.0-1.0>".to_string())
        }
        ("search", Some("on")) => SpecialCommand::Search(true),
        ("search", Some("off")) => SpecialCommand::Search(false),
        ("search", _) => SpecialCommand::Invalid("usage: /search on|off".to_string()),
        ("thinking", Some("on")) => SpecialCommand::Thinking(ThinkingToggle::On),
        ("thinking", Some("off")) => SpecialCommand::Thinking(ThinkingToggle::Off),
        ("thinking", Some(value)) => match value.parse::<u32>() {
            Ok(budget) => SpecialCommand::Thinking(ThinkingToggle::Budget(budget)),
            Err(_) => SpecialCommand::Invalid("usage: /thinking on|off|<budget>".to_string()),
        },
        ("thinking", None) => {
            SpecialCommand::Invalid("usage: /thinking on|off|<budget>".to_string())
        }
        (other, _) => SpecialCommand::Invalid(format!("unknown command /{}; try /help", other)),
    }
}

/// Prints the interactive command reference
pub fn print_help() {
    println!("\n{}", "Available commands:".bold());
    println!("  /attach <path>          Stage an image for the next message");
    println!("  /model <name>           Switch models (see /models)");
    println!("  /models                 List known models");
    println!("  /temp <0.0-1.0>         Set the sampling temperature");
    println!("  /search on|off          Toggle web-grounded search");
    println!("  /thinking on|off|<n>    Toggle thinking, or set its budget");
    println!("  /status                 Show session configuration");
    println!("  /usage                  Show cumulative token usage");
    println!("  /clear                  Reset the conversation");
    println!("  /help                   Show this help");
    println!("  exit                    End the session\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_none() {
        assert_eq!(parse_special_command("hello world"), SpecialCommand::None);
        assert_eq!(parse_special_command("what is 2/3?"), SpecialCommand::None);
    }

    #[test]
    fn test_exit_variants() {
        assert_eq!(parse_special_command("exit"), SpecialCommand::Exit);
        assert_eq!(parse_special_command("QUIT"), SpecialCommand::Exit);
        assert_eq!(parse_special_command("/exit"), SpecialCommand::Exit);
        assert_eq!(parse_special_command("/quit"), SpecialCommand::Exit);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_special_command("/help"), SpecialCommand::Help);
        assert_eq!(parse_special_command("/status"), SpecialCommand::Status);
        assert_eq!(parse_special_command("/usage"), SpecialCommand::Usage);
        assert_eq!(parse_special_command("/models"), SpecialCommand::Models);
        assert_eq!(parse_special_command("/clear"), SpecialCommand::Clear);
    }

    #[test]
    fn test_attach_keeps_spaces_in_path() {
        assert_eq!(
            parse_special_command("/attach my photos/cat picture.png"),
            SpecialCommand::Attach("my photos/cat picture.png".to_string())
        );
    }

    #[test]
    fn test_attach_requires_path() {
        assert!(matches!(
            parse_special_command("/attach"),
            SpecialCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_model_switch() {
        assert_eq!(
            parse_special_command("/model gemini-3-pro-preview"),
            SpecialCommand::Model("gemini-3-pro-preview".to_string())
        );
    }

    #[test]
    fn test_temperature_parsing() {
        assert_eq!(
            parse_special_command("/temp 0.3"),
            SpecialCommand::Temperature(0.3)
        );
        assert_eq!(
            parse_special_command("/temperature 1.0"),
            SpecialCommand::Temperature(1.0)
        );
        assert!(matches!(
            parse_special_command("/temp warm"),
            SpecialCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_search_toggle() {
        assert_eq!(parse_special_command("/search on"), SpecialCommand::Search(true));
        assert_eq!(
            parse_special_command("/search off"),
            SpecialCommand::Search(false)
        );
        assert!(matches!(
            parse_special_command("/search maybe"),
            SpecialCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_thinking_toggle() {
        assert_eq!(
            parse_special_command("/thinking on"),
            SpecialCommand::Thinking(ThinkingToggle::On)
        );
        assert_eq!(
            parse_special_command("/thinking off"),
            SpecialCommand::Thinking(ThinkingToggle::Off)
        );
        assert_eq!(
            parse_special_command("/thinking 512"),
            SpecialCommand::Thinking(ThinkingToggle::Budget(512))
        );
        assert!(matches!(
            parse_special_command("/thinking lots"),
            SpecialCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_special_command("/frobnicate"),
            SpecialCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_case_insensitive_command_names() {
        assert_eq!(parse_special_command("/HELP"), SpecialCommand::Help);
        assert_eq!(
            parse_special_command("/Search ON"),
            SpecialCommand::Invalid("usage: /search on|off".to_string())
        );
    }
}
