use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use login_relay::terminal::{BrowserOpener, StderrRuntime, TerminalPrompter};
use login_relay::{
    AnthropicProvider, EnvironmentMode, LoginOptions, OAuthClient, OAuthClientConfig, OAuthError,
    OAuthProvider, login_anthropic_pro,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "login-relay",
    about = "Sign in to an AI provider via OAuth, locally or from a headless host, and print the tokens as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Claude Pro/Max subscription login.
    Anthropic(LoginArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Print the URL instead of opening a browser; paste the code back.
    #[arg(long, conflicts_with = "local")]
    remote: bool,

    /// Open the browser on this machine even if the host looks headless.
    #[arg(long)]
    local: bool,

    /// Progress text shown while the browser is open.
    #[arg(long)]
    browser_message: Option<String>,
}

impl LoginArgs {
    fn options(&self) -> LoginOptions {
        let mode = if self.remote {
            EnvironmentMode::Remote
        } else if self.local {
            EnvironmentMode::Local
        } else {
            EnvironmentMode::detect()
        };

        let options = LoginOptions::new(mode);
        match &self.browser_message {
            Some(message) => options.with_local_browser_message(message),
            None => options,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Anthropic(args) => run_anthropic(&args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Every error path has already written its message to stderr.
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run_anthropic(args: &LoginArgs) -> Result<(), OAuthError> {
    let provider = AnthropicProvider;
    let config = OAuthClientConfig::new(
        AnthropicProvider::default_client_id(),
        AnthropicProvider::default_redirect_uri(),
    )
    .with_scope(provider.default_scope());

    let client = OAuthClient::new(provider, config).inspect_err(|err| eprintln!("Error: {err}"))?;

    let tokens = login_anthropic_pro(
        &client,
        &TerminalPrompter,
        &StderrRuntime,
        &BrowserOpener,
        &args.options(),
    )
    .await?;

    let Some(tokens) = tokens else {
        eprintln!("No credentials returned.");
        return Ok(());
    };

    let output = serde_json::to_string_pretty(&tokens)
        .map_err(|err| OAuthError::InvalidResponse {
            message: err.to_string(),
            body: String::new(),
        })
        .inspect_err(|err| eprintln!("Error: {err}"))?;

    println!("{output}");
    Ok(())
}
