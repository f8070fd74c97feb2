//! REPL built-in commands
//!
//! Any line starting with `/` is a command; everything else is a message
//! for the assistant.

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Symptoms,
    Risk,
    Reminder,
    /// `/lang [code]`, listing languages when no code is given
    Language { code: Option<String> },
    /// `/interval [hours]`
    Interval { hours: Option<String> },
    /// `/notify [on|off]`, toggling when no value is given
    Notify { enable: Option<bool> },
    Contacts,
    Stats,
    History { limit: Option<usize> },
    Unknown { input: String },
}

/// Check if input is a command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse input into a command; `None` for ordinary messages
pub fn parse(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed[1..].split_whitespace();
    let Some(name) = parts.next() else {
        return Some(Command::Unknown {
            input: trimmed.to_string(),
        });
    };
    let arg = parts.next().map(str::to_string);

    let command = match name.to_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "symptoms" | "s" => Command::Symptoms,
        "risk" => Command::Risk,
        "reminder" | "r" => Command::Reminder,
        "lang" | "language" => Command::Language { code: arg },
        "interval" => Command::Interval { hours: arg },
        "notify" | "notifications" => Command::Notify {
            enable: arg.as_deref().and_then(parse_toggle),
        },
        "contacts" => Command::Contacts,
        "stats" => Command::Stats,
        "history" => Command::History {
            limit: arg.and_then(|s| s.parse().ok()),
        },
        _ => Command::Unknown {
            input: trimmed.to_string(),
        },
    };
    Some(command)
}

fn parse_toggle(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Some(true),
        "off" | "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Help rows: usage and description
pub const HELP: &[(&str, &str)] = &[
    ("/symptoms, /s", "Show tracked symptoms and advice"),
    ("/risk", "Show the current risk level and guidance"),
    ("/reminder, /r", "Show the next check-in reminder"),
    ("/interval <4|8|12|24>", "Change the reminder interval"),
    ("/notify [on|off]", "Toggle reminder notifications"),
    ("/lang [en|es|fr]", "Change the display language"),
    ("/contacts", "Show emergency contacts"),
    ("/history [n]", "Show the last n turns (default: 10)"),
    ("/stats", "Show session statistics"),
    ("/help, /h", "Show this help message"),
    ("/exit, /quit, /q", "Exit EpiGuard"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command("  /exit"));
        assert!(!is_command("I feel sick"));
    }

    #[test]
    fn test_plain_message_is_not_command() {
        assert_eq!(parse("my head hurts"), None);
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/help"), Some(Command::Help));
        assert_eq!(parse("/Q"), Some(Command::Exit));
        assert_eq!(parse("/s"), Some(Command::Symptoms));
        assert_eq!(parse("/risk"), Some(Command::Risk));
        assert_eq!(parse("/stats"), Some(Command::Stats));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse("/lang es"),
            Some(Command::Language {
                code: Some("es".to_string())
            })
        );
        assert_eq!(
            parse("/interval 8"),
            Some(Command::Interval {
                hours: Some("8".to_string())
            })
        );
        assert_eq!(parse("/notify off"), Some(Command::Notify { enable: Some(false) }));
        assert_eq!(parse("/notify"), Some(Command::Notify { enable: None }));
        assert_eq!(parse("/history 3"), Some(Command::History { limit: Some(3) }));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/dance"),
            Some(Command::Unknown {
                input: "/dance".to_string()
            })
        );
        assert!(matches!(parse("/"), Some(Command::Unknown { .. })));
    }
}
