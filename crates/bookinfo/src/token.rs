//! OAuth2 client-credentials token provider for the book-info registration.

use anyhow::Context;
use oauth2::{
    basic::BasicClient, AccessToken, ClientId, ClientSecret, EndpointNotSet, EndpointSet, Scope,
    TokenResponse, TokenUrl,
};

use herald_kernel::settings::OAuthSettings;

use crate::error::BookInfoError;

type ConfiguredTokenClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Obtains bearer tokens for the configured client registration using the
/// client-credentials grant. Token refresh and caching stay with the
/// authorization server; every call performs a fresh exchange.
pub struct TokenProvider {
    registration: String,
    principal: String,
    scope: Option<String>,
    oauth_client: ConfiguredTokenClient,
    http: reqwest::Client,
}

impl TokenProvider {
    /// Build a provider from the OAuth section of the settings.
    pub fn from_settings(settings: &OAuthSettings) -> anyhow::Result<Self> {
        let token_url = TokenUrl::new(settings.token_url.clone())
            .with_context(|| format!("invalid OAuth token URL '{}'", settings.token_url))?;

        let mut oauth_client =
            BasicClient::new(ClientId::new(settings.client_id.clone())).set_token_uri(token_url);

        if !settings.client_secret.is_empty() {
            oauth_client =
                oauth_client.set_client_secret(ClientSecret::new(settings.client_secret.clone()));
        }

        // Token endpoints return results directly; following redirects here
        // would leak credentials to an unexpected host.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .with_context(|| "failed to build HTTP client for the token endpoint")?;

        Ok(Self {
            registration: settings.registration.clone(),
            principal: settings.principal.clone(),
            scope: settings.scope.clone(),
            oauth_client,
            http,
        })
    }

    /// Name of the client registration this provider authorizes against.
    pub fn registration(&self) -> &str {
        &self.registration
    }

    /// Perform the client-credentials exchange and return the access token.
    ///
    /// Every failure of this step is an authorization failure: callers must
    /// not attempt the downstream call without a token.
    pub async fn authorize(&self) -> Result<AccessToken, BookInfoError> {
        let mut request = self.oauth_client.exchange_client_credentials();

        if let Some(scope) = &self.scope {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let response = request.request_async(&self.http).await.map_err(|err| {
            tracing::error!(
                registration = %self.registration,
                principal = %self.principal,
                error = %err,
                "client-credentials exchange failed"
            );

            BookInfoError::Authorization {
                reason: err.to_string(),
            }
        })?;

        tracing::info!(
            registration = %self.registration,
            principal = %self.principal,
            "obtained client-credentials access token"
        );

        Ok(response.access_token().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_token_url() {
        let settings = OAuthSettings {
            token_url: "not a url".to_string(),
            ..OAuthSettings::default()
        };

        assert!(TokenProvider::from_settings(&settings).is_err());
    }

    #[test]
    fn carries_registration_from_settings() {
        let provider = TokenProvider::from_settings(&OAuthSettings::default()).unwrap();
        assert_eq!(provider.registration(), "keycloak");
    }
}
