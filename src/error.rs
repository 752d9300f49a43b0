use thiserror::Error;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("os rng error: {message}")]
    OsRng { message: String },

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header: {name}={value}")]
    InvalidHeader { name: String, value: String },

    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String, body: String },

    #[error("missing authorization code in pasted input")]
    MissingAuthorizationCode,

    #[error("no valid authorization code after {attempts} attempts")]
    TooManyCodeAttempts { attempts: u32 },

    #[error("state mismatch (expected={expected}, received={received})")]
    StateMismatch { expected: String, received: String },

    #[error("input closed before an authorization code was entered")]
    InputClosed,

    #[error("prompt failed: {message}")]
    Prompt { message: String },

    #[error("failed to open browser: {0}")]
    Browser(std::io::Error),
}
