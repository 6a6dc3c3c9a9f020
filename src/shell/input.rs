//! Line-based console I/O for the shell.

use log::warn;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::identity::Secret;

/// Reads prompted lines and secrets, writes replies.
///
/// Secrets are read hidden from the terminal when `hidden_secrets` is set,
/// otherwise as a plain line from the same reader as commands.
pub struct Console<R, W> {
    reader: R,
    writer: W,
    hidden_secrets: bool,
    max_line_length: usize,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, hidden_secrets: bool, max_line_length: usize) -> Self {
        Self {
            reader,
            writer,
            hidden_secrets,
            max_line_length,
        }
    }

    pub async fn say(&mut self, message: &str) -> std::io::Result<()> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    /// Prompts and reads one line without its line ending. `None` on end of
    /// input. Over-long lines are refused and the prompt is repeated.
    pub async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        loop {
            self.writer.write_all(prompt.as_bytes()).await?;
            self.writer.flush().await?;

            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            if line.len() > self.max_line_length {
                warn!("Refused input line of {} bytes", line.len());
                self.say("Command too long").await?;
                continue;
            }
            return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()));
        }
    }

    /// Prompts for a secret. The text read is never echoed or logged.
    pub async fn ask_secret(&mut self, prompt: &str) -> std::io::Result<Option<Secret>> {
        if !self.hidden_secrets {
            return Ok(self.ask(prompt).await?.map(Secret::from));
        }

        let prompt = prompt.to_string();
        let secret = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await
            .map_err(std::io::Error::other)??;
        Ok(Some(Secret::from(secret)))
    }

    /// Yes/no question; anything but `y`/`yes` is no.
    pub async fn confirm(&mut self, prompt: &str) -> std::io::Result<bool> {
        let answer = self.ask(prompt).await?.unwrap_or_default();
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
