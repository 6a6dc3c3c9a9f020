//! Module `commands`
//!
//! Shell command grammar and the result type every handler returns.

/// A command typed at the shell prompt once logged in.
///
/// Verbs are case-insensitive and have a one-letter short form where the
/// interactive program always offered one.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Open a folder (becomes the cursor) or print a file
    View(Option<String>),
    Up,
    /// Back to the root folder
    Start,
    List,
    New(String),
    Delete(String),
    Move(String, String),
    Copy(String, String),
    Append(String, String),
    Clear(String),
    Rename(String),
    Logout,
    Exit,
    Unknown,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    /// Persist and go back to the login prompt
    Logout,
    /// Persist and end the process
    Exit,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            message: Some(reason.clone()),
            status: CommandStatus::Failure(reason),
        }
    }
}

/// Parses a raw line into a [`Command`].
///
/// Returns `Unknown` for unknown verbs and for known verbs missing an argument.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
    let rest = parts.next().unwrap_or("").trim();

    let mut args = rest.split_whitespace();
    let first = args.next().map(str::to_string);
    let second = args.next().map(str::to_string);
    let extra = args.next().is_some();

    match (cmd.as_str(), first, second) {
        ("v" | "view", arg, None) => Command::View(arg),
        ("..", None, None) => Command::Up,
        ("s" | "start", None, None) => Command::Start,
        ("ls" | "list", None, None) => Command::List,
        ("n" | "new", Some(path), None) => Command::New(path),
        ("d" | "delete", Some(path), None) => Command::Delete(path),
        ("m" | "move", Some(src), Some(dst)) if !extra => Command::Move(src, dst),
        ("c" | "copy", Some(src), Some(dst)) if !extra => Command::Copy(src, dst),
        ("a" | "append", Some(file), Some(_)) => {
            let text = rest[file.len()..].trim_start();
            Command::Append(file, text.to_string())
        }
        ("clear", Some(file), None) => Command::Clear(file),
        ("u" | "rename", Some(name), None) => Command::Rename(name),
        ("l" | "logout", None, None) => Command::Logout,
        ("e" | "exit", None, None) => Command::Exit,
        _ => Command::Unknown,
    }
}
