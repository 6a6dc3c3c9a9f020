//! Interactive storage shell
//!
//! Drives the login state machine over a line-based console and dispatches
//! commands for the logged-in session.

pub mod commands;
pub mod handlers;
pub mod input;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
pub use input::Console;

use log::{error, info};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::handlers::{error_to_message, handle_error};
use crate::error::{AuthError, CoreError};
use crate::service::{Attempt, StorageService};
use crate::session::LoginState;

/// Runs the shell until `exit` or end of input. The registry is persisted on
/// every logout and before returning, including when the console fails.
pub async fn run<R, W>(
    service: &mut StorageService,
    console: &mut Console<R, W>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let outcome = drive(service, console).await;
    if let Err(e) = &outcome {
        error!("Console failure, saving before exit: {}", e);
    }

    let saved = persist(service, console).await;
    outcome.and(saved)
}

/// The login and command loop. Returns on `exit`, end of input, or the
/// first console error.
async fn drive<R, W>(
    service: &mut StorageService,
    console: &mut Console<R, W>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut state = LoginState::LoggedOut;

    loop {
        state = match state {
            LoginState::LoggedOut => {
                let Some(name) = console.ask("Username: ").await? else {
                    break;
                };
                let name = name.trim();
                if name.is_empty() {
                    LoginState::LoggedOut
                } else {
                    start_login(service, console, name).await?
                }
            }
            LoginState::Authenticating(challenge) => {
                let prompt = if challenge.is_registration() {
                    "Choose a password: "
                } else {
                    "Password: "
                };
                let Some(secret) = console.ask_secret(prompt).await? else {
                    break;
                };

                match service.submit_secret(challenge, secret) {
                    Ok(Attempt::Accepted(session)) => {
                        console
                            .say(&format!("Welcome, {}. You are in /", session.name()))
                            .await?;
                        LoginState::LoggedIn(session)
                    }
                    Ok(Attempt::Rejected(challenge)) => {
                        console
                            .say(&format!(
                                "Incorrect password, {} attempts left",
                                challenge.attempts_left()
                            ))
                            .await?;
                        LoginState::Authenticating(challenge)
                    }
                    Err(e) => {
                        report(console, &e).await?;
                        LoginState::LoggedOut
                    }
                }
            }
            LoginState::LoggedIn(mut session) => {
                let prompt = format!("{}:{}> ", session.name(), session.cursor_virtual_path());
                let Some(line) = console.ask(&prompt).await? else {
                    break;
                };

                let command = parse_command(&line);
                info!("Received from {}: {:?}", session.name(), &command);

                let result = handle_command(service, &mut session, &command);
                if let Some(message) = result.message {
                    console.say(&message).await?;
                }

                match result.status {
                    CommandStatus::Success | CommandStatus::Failure(_) => {
                        LoginState::LoggedIn(session)
                    }
                    CommandStatus::Logout => {
                        drop(session);
                        persist(service, console).await?;
                        LoginState::LoggedOut
                    }
                    CommandStatus::Exit => {
                        drop(session);
                        break;
                    }
                }
            }
        };
    }

    Ok(())
}

/// Turns a typed name into a challenge, offering registration for unknown
/// names.
async fn start_login<R, W>(
    service: &mut StorageService,
    console: &mut Console<R, W>,
    name: &str,
) -> std::io::Result<LoginState>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let challenge = match service.begin_login(name) {
        Ok(challenge) => Ok(challenge),
        Err(AuthError::UnknownIdentity(_)) => {
            if !console
                .confirm("User not found, create new user? (y/n): ")
                .await?
            {
                return Ok(LoginState::LoggedOut);
            }
            service.begin_registration(name)
        }
        Err(e) => Err(e),
    };

    match challenge {
        Ok(challenge) => Ok(LoginState::Authenticating(challenge)),
        Err(e) => {
            report(console, &CoreError::from(e)).await?;
            Ok(LoginState::LoggedOut)
        }
    }
}

/// Saves the registry. A failed save is reported on the console, which may
/// itself fail; the save is attempted first either way.
async fn persist<R, W>(
    service: &StorageService,
    console: &mut Console<R, W>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Err(e) = service.save() {
        error!("Failed to save identity store: {}", e);
        report(console, &CoreError::from(e)).await?;
    }
    Ok(())
}

async fn report<R, W>(console: &mut Console<R, W>, err: &CoreError) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    handle_error(err);
    console.say(error_to_message(err)).await
}
