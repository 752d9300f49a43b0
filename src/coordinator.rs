use tracing::{debug, info, warn};

use crate::exchange::{AuthorizationChannel, TokenExchange};
use crate::handlers::{
    AuthorizationEvent, CodeRequest, DEFAULT_LOCAL_BROWSER_MESSAGE, HandlerParams, OAuthHandlers,
    create_handlers,
};
use crate::ui::{ProgressGuard, Prompter, RuntimeEnv, UrlOpener};
use crate::{EnvironmentMode, OAuthError};

const NOTE_TITLE: &str = "Anthropic Pro/Max OAuth";
const HELP_TITLE: &str = "OAuth help";
const CODE_PROMPT: &str = "Paste the authorization code";

const STARTING_LABEL: &str = "Starting OAuth flow…";
const COMPLETE_LABEL: &str = "Anthropic OAuth complete";
const FAILED_LABEL: &str = "Anthropic OAuth failed";

const REMOTE_NOTE: &[&str] = &[
    "You are running in a remote/VPS environment.",
    "A URL will be shown for you to open in your LOCAL browser.",
    "After signing in, paste the authorization code back here.",
];

const LOCAL_NOTE: &[&str] = &[
    "Browser will open for Anthropic authentication.",
    "Sign in with your Claude Pro or Max account.",
    "If the callback doesn't auto-complete, paste the redirect URL.",
];

const HELP_NOTE: &[&str] = &[
    "Trouble with OAuth?",
    "Make sure you have an active Claude Pro or Max subscription.",
    "See https://docs.openclaw.ai/providers/anthropic",
];

#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
    pub mode: EnvironmentMode,
    pub local_browser_message: Option<String>,
}

impl LoginOptions {
    pub fn new(mode: EnvironmentMode) -> Self {
        Self {
            mode,
            local_browser_message: None,
        }
    }

    pub fn detect() -> Self {
        Self::new(EnvironmentMode::detect())
    }

    pub fn with_local_browser_message(mut self, message: impl Into<String>) -> Self {
        self.local_browser_message = Some(message.into());
        self
    }

    fn local_browser_message(&self) -> &str {
        self.local_browser_message
            .as_deref()
            .unwrap_or(DEFAULT_LOCAL_BROWSER_MESSAGE)
    }
}

/// Runs an interactive Anthropic Pro/Max login through `exchange`.
///
/// Returns `Ok(None)` when the exchange completes without credentials. Every
/// failure is reported through `runtime` exactly once. When the exchange
/// fails, the progress indicator is stopped, a help note is shown, and the
/// exchange's error is returned as-is.
pub async fn login_anthropic_pro<X, P, R, O>(
    exchange: &X,
    prompter: &P,
    runtime: &R,
    opener: &O,
    options: &LoginOptions,
) -> Result<Option<X::Credentials>, OAuthError>
where
    X: TokenExchange,
    P: Prompter,
    R: RuntimeEnv,
    O: UrlOpener,
{
    let intro = match options.mode {
        EnvironmentMode::Remote => REMOTE_NOTE,
        EnvironmentMode::Local => LOCAL_NOTE,
    };
    if let Err(err) = prompter.note(&intro.join("\n"), NOTE_TITLE).await {
        runtime.error(&err.to_string());
        return Err(err);
    }

    info!(mode = ?options.mode, "starting oauth login");
    let mut progress = ProgressGuard::new(prompter.progress(STARTING_LABEL), FAILED_LABEL);

    let outcome = {
        let handlers = create_handlers(HandlerParams {
            mode: options.mode,
            prompter,
            runtime,
            progress: &mut progress,
            opener,
            local_browser_message: options.local_browser_message(),
        });
        let mut channel = HandlerChannel { handlers };
        exchange.exchange(&mut channel).await
    };

    match outcome {
        Ok(credentials) => {
            progress.finish(COMPLETE_LABEL);
            if credentials.is_none() {
                debug!("exchange finished without credentials");
            }
            info!("oauth login complete");
            Ok(credentials)
        }
        Err(err) => {
            progress.finish(FAILED_LABEL);
            runtime.error(&err.to_string());
            if let Err(note_err) = prompter.note(&HELP_NOTE.join("\n"), HELP_TITLE).await {
                warn!(error = %note_err, "failed to show oauth help note");
            }
            Err(err)
        }
    }
}

/// Adapts the handlers to the calls an exchange makes.
struct HandlerChannel<'a, P: Prompter, R, O> {
    handlers: OAuthHandlers<'a, P, R, O>,
}

impl<P, R, O> AuthorizationChannel for HandlerChannel<'_, P, R, O>
where
    P: Prompter,
    R: RuntimeEnv,
    O: UrlOpener,
{
    async fn deliver_url(&mut self, url: &str) -> Result<(), OAuthError> {
        self.handlers
            .on_auth(AuthorizationEvent {
                url: url.to_string(),
            })
            .await;
        Ok(())
    }

    async fn collect_code(&mut self) -> Result<String, OAuthError> {
        self.handlers.on_prompt(CodeRequest::new(CODE_PROMPT)).await
    }
}
