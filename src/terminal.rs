//! Terminal implementations of the UI contracts.
//!
//! Notes and progress go to stderr so stdout stays free for the credentials a
//! caller may want to pipe elsewhere.

use std::io::{self, Write};

use dialoguer::Input;
use tracing::debug;

use crate::OAuthError;
use crate::ui::{ProgressHandle, Prompter, RuntimeEnv, UrlOpener};

const BAR: &str = "│";
const ACTIVE: &str = "◒";
const DONE: &str = "◇";

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    type Progress = TerminalProgress;

    async fn note(&self, message: &str, title: &str) -> Result<(), OAuthError> {
        write_note(&mut io::stderr().lock(), message, title)?;
        Ok(())
    }

    async fn text(&self, message: &str) -> Result<String, OAuthError> {
        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .interact_text()
        })
        .await
        .map_err(|err| OAuthError::Prompt {
            message: err.to_string(),
        })?;

        answer.map_err(input_error)
    }

    fn progress(&self, initial_label: &str) -> TerminalProgress {
        eprintln!("{ACTIVE}  {initial_label}");
        TerminalProgress {
            label: initial_label.to_string(),
        }
    }
}

/// Maps a failed read to `InputClosed` when stdin is gone or is not a tty.
fn input_error(err: dialoguer::Error) -> OAuthError {
    match err {
        dialoguer::Error::IO(io)
            if matches!(
                io.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::NotConnected
            ) =>
        {
            debug!(error = %io, "no interactive input available");
            OAuthError::InputClosed
        }
        other => OAuthError::Prompt {
            message: other.to_string(),
        },
    }
}

fn write_note<W: Write>(out: &mut W, message: &str, title: &str) -> io::Result<()> {
    writeln!(out, "{DONE}  {title}")?;
    for line in message.lines() {
        writeln!(out, "{BAR}  {line}")?;
    }
    writeln!(out, "{BAR}")
}

fn write_error<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "Error: {message}")
}

/// Line-based progress indicator; each label change prints a new line.
#[derive(Debug)]
pub struct TerminalProgress {
    label: String,
}

impl TerminalProgress {
    /// Returns the line to print, or `None` when the label is unchanged.
    fn relabel(&mut self, label: &str) -> Option<String> {
        if self.label == label {
            return None;
        }
        self.label = label.to_string();
        Some(format!("{ACTIVE}  {label}"))
    }
}

impl ProgressHandle for TerminalProgress {
    fn set_label(&mut self, label: &str) {
        if let Some(line) = self.relabel(label) {
            eprintln!("{line}");
        }
    }

    fn stop(self, final_label: &str) {
        eprintln!("{DONE}  {final_label}");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StderrRuntime;

impl RuntimeEnv for StderrRuntime {
    fn log(&self, message: &str) {
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        debug!(error = %message, "reporting oauth failure");
        if let Err(err) = write_error(&mut io::stderr().lock(), message) {
            debug!(error = %err, "failed to write error to stderr");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    async fn open_url(&self, url: &str) -> Result<(), OAuthError> {
        webbrowser::open(url).map_err(OAuthError::Browser)
    }
}
