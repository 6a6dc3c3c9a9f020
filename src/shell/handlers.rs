//! Command handlers for the storage shell.
//!
//! Each handler drives one session operation and renders its outcome. Paths
//! are always shown as virtual paths rooted at the identity's folder.

use log::info;

use crate::error::CoreError;
use crate::error::handlers::{error_to_message, handle_error};
use crate::navigate::EntryView;
use crate::service::StorageService;
use crate::session::Session;
use crate::shell::commands::{Command, CommandResult, CommandStatus};
use crate::storage::results::EntryInfo;

const HELP: &str = "Commands: v [path], .., s, ls, n <path>, d <path>, m <src> <dst>, \
c <src> <dst>, a <file> <text>, clear <file>, u <name>, l, e";

/// Dispatches a parsed command against the logged-in session.
pub fn handle_command(
    service: &mut StorageService,
    session: &mut Session,
    command: &Command,
) -> CommandResult {
    let outcome = match command {
        Command::View(path) => handle_cmd_view(session, path.as_deref().unwrap_or("")),
        Command::Up => session
            .go_up()
            .map(|view| render_view(&view))
            .map_err(CoreError::from),
        Command::Start => {
            session.go_home();
            Ok("Back in /".to_string())
        }
        Command::List => handle_cmd_list(session),
        Command::New(path) => handle_cmd_new(session, path),
        Command::Delete(path) => handle_cmd_delete(session, path),
        Command::Move(source, dest) => handle_cmd_move(session, source, dest),
        Command::Copy(source, dest) => handle_cmd_copy(session, source, dest),
        Command::Append(file, text) => handle_cmd_append(session, file, text),
        Command::Clear(file) => session
            .clear(file)
            .map(|_| format!("Cleared {}", file))
            .map_err(CoreError::from),
        Command::Rename(name) => service
            .rename(session, name)
            .map(|_| format!("You are now {}", name))
            .map_err(CoreError::from),
        Command::Logout => return handle_cmd_logout(session),
        Command::Exit => {
            return CommandResult {
                status: CommandStatus::Exit,
                message: Some("Goodbye".into()),
            };
        }
        Command::Unknown => return CommandResult::failure(HELP),
    };

    match outcome {
        Ok(message) => CommandResult::success(message),
        Err(e) => {
            handle_error(&e);
            CommandResult::failure(error_to_message(&e))
        }
    }
}

fn handle_cmd_view(session: &mut Session, path: &str) -> Result<String, CoreError> {
    let view = session.navigate(path)?;
    Ok(render_view(&view))
}

fn handle_cmd_list(session: &Session) -> Result<String, CoreError> {
    let entries = session.list()?;
    Ok(render_listing(&session.cursor_virtual_path(), &entries))
}

fn handle_cmd_new(session: &mut Session, path: &str) -> Result<String, CoreError> {
    let result = session.create(path)?;
    let what = if result.is_file { "file" } else { "folder" };
    Ok(format!("Created {} {}", what, session.virtual_path(&result.path)))
}

fn handle_cmd_delete(session: &mut Session, path: &str) -> Result<String, CoreError> {
    let shown = session.virtual_path(&session.resolve(path));
    let result = session.delete(path)?;
    Ok(format!(
        "Deleted {} ({} entries)",
        shown,
        result.report.completed()
    ))
}

fn handle_cmd_move(session: &mut Session, source: &str, dest: &str) -> Result<String, CoreError> {
    let shown = session.virtual_path(&session.resolve(source));
    let result = session.move_to(source, dest)?;
    Ok(format!("Moved {} to {}", shown, session.virtual_path(&result.target)))
}

fn handle_cmd_copy(session: &mut Session, source: &str, dest: &str) -> Result<String, CoreError> {
    let result = session.copy_to(source, dest)?;
    Ok(format!(
        "Copied {} to {} ({} entries)",
        session.virtual_path(&result.source),
        session.virtual_path(&result.target),
        result.report.completed()
    ))
}

/// Appends `text` as one line.
fn handle_cmd_append(session: &mut Session, file: &str, text: &str) -> Result<String, CoreError> {
    let mut line = text.as_bytes().to_vec();
    line.push(b'\n');
    session.append(file, &line)?;
    Ok(format!("Appended to {}", file))
}

fn handle_cmd_logout(session: &Session) -> CommandResult {
    info!("Logout requested by {}", session.name());
    CommandResult {
        status: CommandStatus::Logout,
        message: Some(format!("Goodbye, {}", session.name())),
    }
}

fn render_view(view: &EntryView) -> String {
    match view {
        EntryView::Directory {
            virtual_path,
            entries,
        } => render_listing(virtual_path, entries),
        EntryView::File {
            virtual_path,
            contents,
        } => format!(
            "{}:\n{}",
            virtual_path,
            String::from_utf8_lossy(contents).trim_end()
        ),
    }
}

fn render_listing(virtual_path: &str, entries: &[EntryInfo]) -> String {
    if entries.is_empty() {
        return format!("{} (empty)", virtual_path);
    }

    let mut out = format!("{}:", virtual_path);
    for entry in entries {
        if entry.is_dir {
            out.push_str(&format!("\n  {}/", entry.name));
        } else {
            out.push_str(&format!("\n  {} ({} bytes)", entry.name, entry.size));
        }
    }
    out
}
