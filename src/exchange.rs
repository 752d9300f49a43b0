use std::future::Future;

use crate::OAuthError;

/// The two operations an exchange may call back into while it runs.
///
/// An exchange may call either one any number of times, in whatever order its
/// protocol needs, before it resolves.
pub trait AuthorizationChannel {
    /// Hands over the URL the user has to open to authorize.
    fn deliver_url(&mut self, url: &str) -> impl Future<Output = Result<(), OAuthError>>;

    /// Asks the user for an authorization code or a full callback URL.
    fn collect_code(&mut self) -> impl Future<Output = Result<String, OAuthError>>;
}

/// Performs the authorization-code exchange against an identity provider.
///
/// `Ok(None)` means the exchange finished without credentials. Failures are
/// always returned as `Err`.
pub trait TokenExchange {
    type Credentials;

    fn exchange<C>(
        &self,
        channel: &mut C,
    ) -> impl Future<Output = Result<Option<Self::Credentials>, OAuthError>>
    where
        C: AuthorizationChannel;
}
