//! Recording fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::exchange::{AuthorizationChannel, TokenExchange};
use crate::ui::{ProgressHandle, Prompter, RuntimeEnv, UrlOpener};
use crate::OAuthError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Note { title: String, message: String },
    Prompt(String),
    ProgressStarted(String),
    ProgressLabel(String),
    ProgressStopped(String),
    Log(String),
    Error(String),
    OpenUrl(String),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<UiEvent>>>);

impl Journal {
    pub fn push(&self, event: UiEvent) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.0.lock().unwrap().clone()
    }

    fn collect<T>(&self, pick: impl Fn(&UiEvent) -> Option<T>) -> Vec<T> {
        self.events().iter().filter_map(pick).collect()
    }

    pub fn notes(&self) -> Vec<(String, String)> {
        self.collect(|event| match event {
            UiEvent::Note { title, message } => Some((title.clone(), message.clone())),
            _ => None,
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::Prompt(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn starts(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::ProgressStarted(label) => Some(label.clone()),
            _ => None,
        })
    }

    pub fn stops(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::ProgressStopped(label) => Some(label.clone()),
            _ => None,
        })
    }

    pub fn logs(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::Log(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::Error(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.collect(|event| match event {
            UiEvent::OpenUrl(url) => Some(url.clone()),
            _ => None,
        })
    }
}

/// Answers prompts from a script; an exhausted script behaves like a closed
/// input stream.
pub struct RecordingPrompter {
    journal: Journal,
    answers: Mutex<VecDeque<String>>,
    notes_shown: AtomicUsize,
    notes_before_failure: Option<usize>,
}

impl RecordingPrompter {
    pub fn new(journal: &Journal, answers: &[&str]) -> Self {
        Self {
            journal: journal.clone(),
            answers: Mutex::new(answers.iter().map(|answer| answer.to_string()).collect()),
            notes_shown: AtomicUsize::new(0),
            notes_before_failure: None,
        }
    }

    /// Lets `count` notes through, then fails every later one.
    pub fn with_notes_failing_after(mut self, count: usize) -> Self {
        self.notes_before_failure = Some(count);
        self
    }
}

impl Prompter for RecordingPrompter {
    type Progress = RecordingProgress;

    async fn note(&self, message: &str, title: &str) -> Result<(), OAuthError> {
        let shown = self.notes_shown.fetch_add(1, Ordering::SeqCst);
        if self.notes_before_failure.is_some_and(|limit| shown >= limit) {
            return Err(OAuthError::Prompt {
                message: "terminal detached".to_string(),
            });
        }
        self.journal.push(UiEvent::Note {
            title: title.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn text(&self, message: &str) -> Result<String, OAuthError> {
        self.journal.push(UiEvent::Prompt(message.to_string()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(OAuthError::InputClosed)
    }

    fn progress(&self, initial_label: &str) -> RecordingProgress {
        RecordingProgress::start(&self.journal, initial_label)
    }
}

pub struct RecordingProgress {
    journal: Journal,
}

impl RecordingProgress {
    pub fn start(journal: &Journal, label: &str) -> Self {
        journal.push(UiEvent::ProgressStarted(label.to_string()));
        Self {
            journal: journal.clone(),
        }
    }
}

impl ProgressHandle for RecordingProgress {
    fn set_label(&mut self, label: &str) {
        self.journal.push(UiEvent::ProgressLabel(label.to_string()));
    }

    fn stop(self, final_label: &str) {
        self.journal
            .push(UiEvent::ProgressStopped(final_label.to_string()));
    }
}

pub struct RecordingRuntime {
    journal: Journal,
}

impl RecordingRuntime {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl RuntimeEnv for RecordingRuntime {
    fn log(&self, message: &str) {
        self.journal.push(UiEvent::Log(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.journal.push(UiEvent::Error(message.to_string()));
    }
}

pub struct RecordingOpener {
    journal: Journal,
    fail: bool,
}

impl RecordingOpener {
    pub fn new(journal: &Journal, fail: bool) -> Self {
        Self {
            journal: journal.clone(),
            fail,
        }
    }
}

impl UrlOpener for RecordingOpener {
    async fn open_url(&self, url: &str) -> Result<(), OAuthError> {
        self.journal.push(UiEvent::OpenUrl(url.to_string()));
        if self.fail {
            return Err(OAuthError::Browser(std::io::Error::other(
                "no browser available",
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Deliver(String),
    Collect,
}

/// Drives a channel through a fixed sequence of calls, then resolves with
/// the scripted outcome.
pub struct ScriptedExchange<T> {
    steps: Vec<Step>,
    outcome: Mutex<Option<Result<Option<T>, OAuthError>>>,
    collected: Mutex<Vec<String>>,
}

impl<T> ScriptedExchange<T> {
    pub fn new(steps: Vec<Step>, outcome: Result<Option<T>, OAuthError>) -> Self {
        Self {
            steps,
            outcome: Mutex::new(Some(outcome)),
            collected: Mutex::new(Vec::new()),
        }
    }

    pub fn collected(&self) -> Vec<String> {
        self.collected.lock().unwrap().clone()
    }
}

impl<T> TokenExchange for ScriptedExchange<T> {
    type Credentials = T;

    async fn exchange<C>(&self, channel: &mut C) -> Result<Option<T>, OAuthError>
    where
        C: AuthorizationChannel,
    {
        for step in &self.steps {
            match step {
                Step::Deliver(url) => channel.deliver_url(url).await?,
                Step::Collect => {
                    let code = channel.collect_code().await?;
                    self.collected.lock().unwrap().push(code);
                }
            }
        }

        self.outcome
            .lock()
            .unwrap()
            .take()
            .expect("scripted exchange runs once")
    }
}
