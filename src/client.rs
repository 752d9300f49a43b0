use std::collections::HashMap;
use std::time::Duration;

use reqwest::{
    Client, RequestBuilder,
    header::{HeaderName, HeaderValue},
};
use tracing::{debug, warn};
use url::Url;

use crate::exchange::{AuthorizationChannel, TokenExchange};
use crate::{
    AuthorizationRequest, AuthorizationResponse, OAuthError, OAuthProvider, PkcePair,
    TokenRequestFormat, TokenResponse,
};

const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: Option<String>,
    pub authorize_params: Vec<(String, String)>,
    pub token_params: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    pub max_code_attempts: u32,
}

impl OAuthClientConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scope: None,
            authorize_params: Vec::new(),
            token_params: Vec::new(),
            timeout: None,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// How many pastes to accept before giving up on unparsable input.
    pub fn with_max_code_attempts(mut self, attempts: u32) -> Self {
        self.max_code_attempts = attempts.max(1);
        self
    }

    pub fn with_authorize_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.authorize_params.push((key.into(), value.into()));
        self
    }

    pub fn with_token_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.token_params.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct OAuthClient<P: OAuthProvider> {
    provider: P,
    config: OAuthClientConfig,
    http: Client,
}

impl<P: OAuthProvider> OAuthClient<P> {
    pub fn new(provider: P, config: OAuthClientConfig) -> Result<Self, OAuthError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            provider,
            config,
            http,
        })
    }

    pub fn with_http_client(provider: P, config: OAuthClientConfig, http: Client) -> Self {
        Self {
            provider,
            config,
            http,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    pub fn authorization_url(&self) -> Result<AuthorizationRequest, OAuthError> {
        self.authorization_url_with_state(None)
    }

    pub fn authorization_url_with_state(
        &self,
        state: Option<String>,
    ) -> Result<AuthorizationRequest, OAuthError> {
        let pkce = PkcePair::generate()?;
        let state = state.unwrap_or_else(|| pkce.code_verifier.clone());
        let scope = self
            .config
            .scope
            .as_deref()
            .unwrap_or(self.provider.default_scope());

        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in self.provider.authorize_params() {
            params.insert(key, value);
        }
        for (key, value) in &self.config.authorize_params {
            params.insert(key.clone(), value.clone());
        }

        params.insert("response_type".to_string(), "code".to_string());
        params.insert("client_id".to_string(), self.config.client_id.clone());
        params.insert("redirect_uri".to_string(), self.config.redirect_uri.clone());
        params.insert("scope".to_string(), scope.to_string());
        params.insert("code_challenge".to_string(), pkce.code_challenge.clone());
        params.insert("code_challenge_method".to_string(), "S256".to_string());
        params.insert("state".to_string(), state.clone());

        let mut url = Url::parse(self.provider.authorize_url())?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(&key, &value);
            }
        }

        Ok(AuthorizationRequest {
            authorization_url: url.to_string(),
            pkce,
            state,
            scope: scope.to_string(),
        })
    }

    /// Asks the channel for a code until the input parses, up to
    /// `max_code_attempts` times.
    async fn collect_response<C>(&self, channel: &mut C) -> Result<AuthorizationResponse, OAuthError>
    where
        C: AuthorizationChannel,
    {
        let attempts = self.config.max_code_attempts.max(1);
        for attempt in 1..=attempts {
            let input = channel.collect_code().await?;
            match AuthorizationResponse::from_input(&input) {
                Ok(response) => return Ok(response),
                Err(err @ (OAuthError::MissingAuthorizationCode | OAuthError::Url(_))) => {
                    warn!(attempt, error = %err, "could not read authorization code from input");
                }
                Err(err) => return Err(err),
            }
        }

        Err(OAuthError::TooManyCodeAttempts { attempts })
    }

    pub async fn exchange_code(
        &self,
        response: AuthorizationResponse,
        code_verifier: &str,
        expected_state: Option<&str>,
    ) -> Result<TokenResponse, OAuthError> {
        let AuthorizationResponse { code, state } = response;
        let returned_state = state.as_deref();

        if let (Some(expected), Some(returned)) = (expected_state, returned_state) {
            if expected != returned {
                return Err(OAuthError::StateMismatch {
                    expected: expected.to_string(),
                    received: returned.to_string(),
                });
            }
        }

        let mut payload = HashMap::new();
        payload.insert("grant_type".to_string(), "authorization_code".to_string());
        payload.insert("code".to_string(), code);
        payload.insert("client_id".to_string(), self.config.client_id.clone());
        payload.insert("redirect_uri".to_string(), self.config.redirect_uri.clone());
        payload.insert("code_verifier".to_string(), code_verifier.to_string());

        if let Some(secret) = &self.config.client_secret {
            payload.insert("client_secret".to_string(), secret.clone());
        }

        if self.provider.include_state_in_token_request() {
            if let Some(state_value) = returned_state.or(expected_state) {
                payload.insert("state".to_string(), state_value.to_string());
            }
        }

        self.send_token_request(payload).await
    }

    async fn send_token_request(
        &self,
        mut payload: HashMap<String, String>,
    ) -> Result<TokenResponse, OAuthError> {
        for (key, value) in self.provider.token_params() {
            payload.insert(key, value);
        }
        for (key, value) in &self.config.token_params {
            payload.insert(key.clone(), value.clone());
        }

        let headers = self.provider.token_headers();
        let mut builder = self.http.post(self.provider.token_url());
        builder = apply_headers(builder, &headers)?;

        debug!(provider = self.provider.id(), "requesting tokens");
        let response = match self.provider.token_request_format() {
            TokenRequestFormat::Json => builder.json(&payload).send().await?,
            TokenRequestFormat::Form => builder.form(&payload).send().await?,
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OAuthError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let token = serde_json::from_str(&body).map_err(|err| OAuthError::InvalidResponse {
            message: err.to_string(),
            body,
        })?;

        Ok(token)
    }
}

impl<P: OAuthProvider> TokenExchange for OAuthClient<P> {
    type Credentials = TokenResponse;

    async fn exchange<C>(&self, channel: &mut C) -> Result<Option<TokenResponse>, OAuthError>
    where
        C: AuthorizationChannel,
    {
        let auth = self.authorization_url()?;
        channel.deliver_url(&auth.authorization_url).await?;

        let response = self.collect_response(channel).await?;
        let tokens = self
            .exchange_code(response, &auth.pkce.code_verifier, Some(&auth.state))
            .await?;
        Ok(Some(tokens))
    }
}

fn apply_headers(
    mut builder: RequestBuilder,
    headers: &[(String, String)],
) -> Result<RequestBuilder, OAuthError> {
    for (name, value) in headers {
        let name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| OAuthError::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            })?;
        let value = HeaderValue::from_str(value).map_err(|_| OAuthError::InvalidHeader {
            name: name.to_string(),
            value: value.clone(),
        })?;
        builder = builder.header(name, value);
    }
    Ok(builder)
}
