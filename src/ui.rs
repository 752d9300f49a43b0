//! Contracts for the user-facing side of a login: notes, text input, a
//! progress indicator, plain output and an error sink, and a URL opener.
//!
//! The coordinator only talks to these traits, so a terminal, a GUI wizard, or
//! a test recorder can sit behind them.

use std::future::Future;

use crate::OAuthError;

pub trait Prompter {
    type Progress: ProgressHandle;

    /// Shows an informational note and returns once it has been displayed.
    fn note(&self, message: &str, title: &str) -> impl Future<Output = Result<(), OAuthError>>;

    /// Asks the user for a line of text.
    fn text(&self, message: &str) -> impl Future<Output = Result<String, OAuthError>>;

    fn progress(&self, initial_label: &str) -> Self::Progress;
}

pub trait ProgressHandle {
    fn set_label(&mut self, label: &str);

    fn stop(self, final_label: &str);
}

pub trait RuntimeEnv {
    fn log(&self, message: &str);

    fn error(&self, message: &str);
}

pub trait UrlOpener {
    fn open_url(&self, url: &str) -> impl Future<Output = Result<(), OAuthError>>;
}

/// Owns a progress handle for one login attempt and stops it exactly once.
///
/// `finish` records the outcome. A guard dropped without `finish` stops its
/// handle with the abandon label.
pub struct ProgressGuard<H: ProgressHandle> {
    handle: Option<H>,
    abandon_label: &'static str,
}

impl<H: ProgressHandle> ProgressGuard<H> {
    pub fn new(handle: H, abandon_label: &'static str) -> Self {
        Self {
            handle: Some(handle),
            abandon_label,
        }
    }

    pub fn set_label(&mut self, label: &str) {
        if let Some(handle) = self.handle.as_mut() {
            handle.set_label(label);
        }
    }

    pub fn finish(mut self, final_label: &str) {
        if let Some(handle) = self.handle.take() {
            handle.stop(final_label);
        }
    }
}

impl<H: ProgressHandle> Drop for ProgressGuard<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop(self.abandon_label);
        }
    }
}
