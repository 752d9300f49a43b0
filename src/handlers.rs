//! Environment-aware handlers for the two moments an exchange needs the user:
//! when the authorization URL is ready, and when a code has to be pasted.

use std::future::Future;

use tracing::{debug, warn};

use crate::ui::{ProgressGuard, ProgressHandle, Prompter, RuntimeEnv, UrlOpener};
use crate::{EnvironmentMode, OAuthError};

pub const DEFAULT_LOCAL_BROWSER_MESSAGE: &str = "Complete sign-in in browser…";
pub const REMOTE_WAITING_LABEL: &str = "Waiting for authorization code…";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationEvent {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRequest {
    pub message: String,
}

impl CodeRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How the authorization URL reaches the user and how the code comes back.
pub trait AuthorizationStrategy {
    fn deliver_authorization_url<R, H>(
        &self,
        event: &AuthorizationEvent,
        runtime: &R,
        progress: &mut ProgressGuard<H>,
    ) -> impl Future<Output = ()>
    where
        R: RuntimeEnv,
        H: ProgressHandle;

    fn collect_code<P>(
        &self,
        request: &CodeRequest,
        prompter: &P,
    ) -> impl Future<Output = Result<String, OAuthError>>
    where
        P: Prompter,
    {
        async move {
            let input = prompter.text(&request.message).await?;
            Ok(input.trim().to_string())
        }
    }
}

/// Opens the URL in a browser on this machine.
pub struct LocalStrategy<'a, O> {
    opener: &'a O,
    message: String,
}

impl<O: UrlOpener> AuthorizationStrategy for LocalStrategy<'_, O> {
    async fn deliver_authorization_url<R, H>(
        &self,
        event: &AuthorizationEvent,
        runtime: &R,
        progress: &mut ProgressGuard<H>,
    ) where
        R: RuntimeEnv,
        H: ProgressHandle,
    {
        progress.set_label(&self.message);
        match self.opener.open_url(&event.url).await {
            Ok(()) => debug!(url = %event.url, "opened authorization url in browser"),
            Err(err) => {
                warn!(error = %err, "failed to open browser, showing url instead");
                runtime.log(&format!(
                    "Could not open a browser automatically.\nOpen this URL to continue:\n\n{}\n",
                    event.url
                ));
            }
        }
    }
}

/// Shows the URL as text so the user can open it on another machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteStrategy;

impl AuthorizationStrategy for RemoteStrategy {
    async fn deliver_authorization_url<R, H>(
        &self,
        event: &AuthorizationEvent,
        runtime: &R,
        progress: &mut ProgressGuard<H>,
    ) where
        R: RuntimeEnv,
        H: ProgressHandle,
    {
        progress.set_label(REMOTE_WAITING_LABEL);
        debug!("presenting authorization url for a browser on another machine");
        runtime.log(&format!(
            "\nOpen this URL in your LOCAL browser:\n\n{}\n",
            event.url
        ));
    }
}

pub enum Strategy<'a, O> {
    Local(LocalStrategy<'a, O>),
    Remote(RemoteStrategy),
}

impl<'a, O: UrlOpener> Strategy<'a, O> {
    pub fn select(mode: EnvironmentMode, opener: &'a O, local_browser_message: &str) -> Self {
        match mode {
            EnvironmentMode::Local => Self::Local(LocalStrategy {
                opener,
                message: local_browser_message.to_string(),
            }),
            EnvironmentMode::Remote => Self::Remote(RemoteStrategy),
        }
    }

    pub fn mode(&self) -> EnvironmentMode {
        match self {
            Self::Local(_) => EnvironmentMode::Local,
            Self::Remote(_) => EnvironmentMode::Remote,
        }
    }
}

impl<O: UrlOpener> AuthorizationStrategy for Strategy<'_, O> {
    async fn deliver_authorization_url<R, H>(
        &self,
        event: &AuthorizationEvent,
        runtime: &R,
        progress: &mut ProgressGuard<H>,
    ) where
        R: RuntimeEnv,
        H: ProgressHandle,
    {
        match self {
            Self::Local(local) => {
                local
                    .deliver_authorization_url(event, runtime, progress)
                    .await
            }
            Self::Remote(remote) => {
                remote
                    .deliver_authorization_url(event, runtime, progress)
                    .await
            }
        }
    }
}

pub struct HandlerParams<'a, P: Prompter, R, O> {
    pub mode: EnvironmentMode,
    pub prompter: &'a P,
    pub runtime: &'a R,
    pub progress: &'a mut ProgressGuard<P::Progress>,
    pub opener: &'a O,
    pub local_browser_message: &'a str,
}

pub struct OAuthHandlers<'a, P: Prompter, R, O> {
    strategy: Strategy<'a, O>,
    prompter: &'a P,
    runtime: &'a R,
    progress: &'a mut ProgressGuard<P::Progress>,
}

pub fn create_handlers<'a, P, R, O>(params: HandlerParams<'a, P, R, O>) -> OAuthHandlers<'a, P, R, O>
where
    P: Prompter,
    R: RuntimeEnv,
    O: UrlOpener,
{
    let HandlerParams {
        mode,
        prompter,
        runtime,
        progress,
        opener,
        local_browser_message,
    } = params;

    OAuthHandlers {
        strategy: Strategy::select(mode, opener, local_browser_message),
        prompter,
        runtime,
        progress,
    }
}

impl<P, R, O> OAuthHandlers<'_, P, R, O>
where
    P: Prompter,
    R: RuntimeEnv,
    O: UrlOpener,
{
    pub fn mode(&self) -> EnvironmentMode {
        self.strategy.mode()
    }

    /// Returns once the URL has been opened or displayed; it never waits for
    /// the browser side to complete.
    pub async fn on_auth(&mut self, event: AuthorizationEvent) {
        self.strategy
            .deliver_authorization_url(&event, self.runtime, &mut *self.progress)
            .await;
    }

    pub async fn on_prompt(&self, request: CodeRequest) -> Result<String, OAuthError> {
        self.strategy.collect_code(&request, self.prompter).await
    }
}
