//! Input line parsing
//!
//! Lines starting with `/` are commands, anything else is chat text.

use chatdesk_core::Session;

/// Session reference as typed by the user: 1-based list position or raw id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Id(String),
}

impl Target {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Target::Index(n),
            _ => Target::Id(raw.to_string()),
        }
    }

    /// Session id this target points at. Raw ids pass through unchecked.
    pub fn resolve(&self, sessions: &[Session]) -> Option<String> {
        match self {
            Target::Index(n) => sessions.get(n - 1).map(|s| s.id.clone()),
            Target::Id(id) => Some(id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty or whitespace-only line
    Blank,
    Text(String),
    New,
    List,
    Switch(Target),
    Rename(Target),
    Delete(Target),
    Cancel,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Command::Blank);
        }

        let Some(without_prefix) = trimmed.strip_prefix('/') else {
            return Ok(Command::Text(input.to_string()));
        };

        let mut parts = without_prefix.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

        let target = |usage: &str| {
            arg.map(Target::parse)
                .ok_or_else(|| format!("Usage: /{usage} <number|id>"))
        };

        match name.as_str() {
            "new" | "n" => Ok(Command::New),
            "list" | "ls" => Ok(Command::List),
            "switch" | "s" => Ok(Command::Switch(target("switch")?)),
            "rename" | "r" => Ok(Command::Rename(target("rename")?)),
            "delete" | "rm" => Ok(Command::Delete(target("delete")?)),
            "cancel" => Ok(Command::Cancel),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(format!("Unknown command: /{name}")),
        }
    }
}
