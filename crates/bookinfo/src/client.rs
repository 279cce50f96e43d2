//! HTTP client for the book-info service.

use anyhow::Context;
use oauth2::AccessToken;
use url::Url;

use herald_kernel::settings::BookInfoSettings;

use crate::{error::BookInfoError, models::Book};

/// Client for `GET {base_url}/getbooks`.
///
/// Whatever order the downstream service returns is preserved; no pagination
/// or filtering semantics exist on this endpoint.
pub struct BookInfoClient {
    http: reqwest::Client,
    books_url: Url,
}

impl BookInfoClient {
    /// Build a client for the configured base URL.
    pub fn new(settings: &BookInfoSettings) -> anyhow::Result<Self> {
        let books_url = Url::parse(&format!(
            "{}/getbooks",
            settings.base_url.trim_end_matches('/')
        ))
        .with_context(|| format!("invalid book-info base URL '{}'", settings.base_url))?;

        Ok(Self {
            http: reqwest::Client::new(),
            books_url,
        })
    }

    /// Resolved `/getbooks` endpoint this client calls.
    pub fn books_url(&self) -> &Url {
        &self.books_url
    }

    /// Fetch the current catalog, attaching a bearer header when a token is
    /// supplied. An empty or JSON `null` body counts as zero books.
    pub async fn fetch_books(
        &self,
        bearer: Option<&AccessToken>,
    ) -> Result<Vec<Book>, BookInfoError> {
        let mut request = self.http.get(self.books_url.clone());

        if let Some(token) = bearer {
            request = request.bearer_auth(token.secret());
        }

        let response = request
            .send()
            .await
            .map_err(|source| BookInfoError::Transport { source })?;
        let status = response.status();

        if !status.is_success() {
            return Err(BookInfoError::Protocol {
                status: Some(status.as_u16()),
                detail: format!("unexpected status {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| BookInfoError::Transport { source })?;

        if body.is_empty() {
            return Ok(Vec::new());
        }

        let books: Option<Vec<Book>> =
            serde_json::from_slice(&body).map_err(|err| BookInfoError::Protocol {
                status: Some(status.as_u16()),
                detail: err.to_string(),
            })?;

        Ok(books.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_books_endpoint() {
        let client = BookInfoClient::new(&BookInfoSettings {
            base_url: "http://books.internal:8081".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.books_url().as_str(),
            "http://books.internal:8081/getbooks"
        );
    }

    #[test]
    fn tolerates_trailing_slash_on_base_url() {
        let client = BookInfoClient::new(&BookInfoSettings {
            base_url: "http://books.internal:8081/".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.books_url().as_str(),
            "http://books.internal:8081/getbooks"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = BookInfoClient::new(&BookInfoSettings {
            base_url: "not a url".to_string(),
        });

        assert!(result.is_err());
    }
}
