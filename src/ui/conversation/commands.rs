use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Start a fresh conversation
    New,
    /// Clear the conversation and this client's stored state
    Clear,
    /// Exit the application
    Bye,
}

pub fn command_entries() -> Vec<CommandEntry> {
    SlashCommand::iter()
        .map(|command| CommandEntry {
            keyword: command.command(),
            description: command.description(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub keyword: &'static str,
    pub description: &'static str,
}

impl SlashCommand {
    /// User-visible description shown in the command palette.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::New => "start a new chat (keeps stored state)",
            SlashCommand::Clear => "clear the chat and this client's stored state",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input. Trailing words are ignored;
/// none of the commands take an argument.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    if !input.starts_with('/') {
        return None;
    }

    let head = input[1..].split_whitespace().next()?;

    SlashCommand::from_str(head).ok().or_else(|| {
        match head.to_lowercase().as_str() {
            "q" | "quit" | "exit" => Some(SlashCommand::Bye),
            "n" => Some(SlashCommand::New),
            "reset" => Some(SlashCommand::Clear),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_slash_command("/new"), Some(SlashCommand::New));
        assert_eq!(parse_slash_command("/clear"), Some(SlashCommand::Clear));
        assert_eq!(parse_slash_command("/bye"), Some(SlashCommand::Bye));
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/exit"), Some(SlashCommand::Bye));
        assert_eq!(parse_slash_command("/n"), Some(SlashCommand::New));
        assert_eq!(parse_slash_command("/reset"), Some(SlashCommand::Clear));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_slash_command("hello"), None);
        assert_eq!(parse_slash_command("/frobnicate"), None);
    }

    #[test]
    fn trailing_words_are_ignored() {
        assert_eq!(parse_slash_command("/new from scratch"), Some(SlashCommand::New));
    }

    #[test]
    fn palette_lists_every_command() {
        let entries = command_entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().any(|e| e.keyword == "new"));
        assert!(entries.iter().any(|e| e.keyword == "clear"));
        assert!(entries.iter().any(|e| e.keyword == "bye"));
    }
}
