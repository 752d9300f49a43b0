//! Environment-aware OAuth 2.0 + PKCE login for command-line tools.
//!
//! On a desktop the authorization URL opens in the local browser. On a
//! headless host (SSH session, VPS, container) the URL is printed so the user
//! can authorize on another machine and paste the code back. The coordinator
//! drives any [`TokenExchange`]; [`OAuthClient`] is the bundled one.

mod client;
mod coordinator;
mod environment;
mod error;
pub mod exchange;
pub mod handlers;
mod pkce;
mod providers;
#[cfg(feature = "terminal")]
pub mod terminal;
#[cfg(test)]
mod testing;
mod types;
pub mod ui;

pub use client::{OAuthClient, OAuthClientConfig};
pub use coordinator::{LoginOptions, login_anthropic_pro};
pub use environment::EnvironmentMode;
pub use error::OAuthError;
pub use exchange::{AuthorizationChannel, TokenExchange};
pub use pkce::PkcePair;
pub use providers::{AnthropicProvider, OAuthProvider, TokenRequestFormat};
pub use types::{AuthorizationRequest, AuthorizationResponse, TokenResponse};
