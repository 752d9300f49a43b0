mod anthropic;
mod provider;

pub use anthropic::AnthropicProvider;
pub use provider::{OAuthProvider, TokenRequestFormat};
