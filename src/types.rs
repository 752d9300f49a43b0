use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::OAuthError;

#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub authorization_url: String,
    pub pkce: crate::PkcePair,
    pub state: String,
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub code: String,
    pub state: Option<String>,
}

impl AuthorizationResponse {
    /// Parses whatever the user pasted: a bare code, `code#state` as shown by
    /// the provider's code page, or the full redirect URL.
    pub fn from_input(input: &str) -> Result<Self, OAuthError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(OAuthError::MissingAuthorizationCode);
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Self::from_url(input);
        }

        Ok(Self::from_callback(input, None))
    }

    pub fn from_callback(code: &str, state: Option<&str>) -> Self {
        if state.is_none() {
            if let Some((code_part, state_part)) = code.split_once('#') {
                return Self {
                    code: code_part.to_string(),
                    state: Some(state_part.to_string()).filter(|state| !state.is_empty()),
                };
            }
        }

        Self {
            code: code.to_string(),
            state: state.map(str::to_string),
        }
    }

    /// Reads `code` and `state` from the query, falling back to the fragment.
    pub fn from_url(callback_url: &str) -> Result<Self, OAuthError> {
        let url = Url::parse(callback_url)?;

        let query = url.query_pairs().into_owned();
        let fragment = url
            .fragment()
            .map(|fragment| url::form_urlencoded::parse(fragment.as_bytes()).into_owned())
            .into_iter()
            .flatten();

        let mut code = None;
        let mut state = None;
        for (key, value) in query.chain(fragment) {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "code" if code.is_none() => code = Some(value),
                "state" if state.is_none() => state = Some(value),
                _ => {}
            }
        }

        let code = code.ok_or(OAuthError::MissingAuthorizationCode)?;
        Ok(Self::from_callback(&code, state.as_deref()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::AuthorizationResponse;
    use crate::OAuthError;

    #[test]
    fn from_input_splits_code_page_value() {
        let response = AuthorizationResponse::from_input("  abc123#state456\n").unwrap();
        assert_eq!(response.code, "abc123");
        assert_eq!(response.state.as_deref(), Some("state456"));
    }

    #[test]
    fn from_input_accepts_bare_code() {
        let response = AuthorizationResponse::from_input("CODE123").unwrap();
        assert_eq!(response.code, "CODE123");
        assert_eq!(response.state, None);
    }

    #[test]
    fn from_input_parses_redirect_url() {
        let response = AuthorizationResponse::from_input(
            "https://console.anthropic.com/oauth/code/callback?code=abc123&state=state456",
        )
        .unwrap();
        assert_eq!(response.code, "abc123");
        assert_eq!(response.state.as_deref(), Some("state456"));
    }

    #[test]
    fn from_url_reads_fragment_when_query_is_empty() {
        let response =
            AuthorizationResponse::from_url("http://localhost/callback#code=abc123&state=s").unwrap();
        assert_eq!(response.code, "abc123");
        assert_eq!(response.state.as_deref(), Some("s"));
    }

    #[test]
    fn from_url_ignores_bare_fragment_key() {
        let response =
            AuthorizationResponse::from_input("https://console.example/cb?code=abc#state").unwrap();
        assert_eq!(response.code, "abc");
        assert_eq!(response.state, None);
    }

    #[test]
    fn from_url_prefers_non_empty_fragment_state() {
        let response =
            AuthorizationResponse::from_url("https://console.example/cb?code=abc&state=#state=s1")
                .unwrap();
        assert_eq!(response.state.as_deref(), Some("s1"));
    }

    #[test]
    fn from_input_rejects_empty_and_codeless_urls() {
        assert!(matches!(
            AuthorizationResponse::from_input("   "),
            Err(OAuthError::MissingAuthorizationCode)
        ));
        assert!(matches!(
            AuthorizationResponse::from_input("http://localhost/callback?state=state456"),
            Err(OAuthError::MissingAuthorizationCode)
        ));
    }
}
