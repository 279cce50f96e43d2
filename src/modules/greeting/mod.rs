pub mod models;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};

use herald_bookinfo::{BookInfoClient, BookInfoError, TokenProvider};
use herald_kernel::{settings::Settings, InitCtx, Module};

use models::Greeting;

/// Per-process state for the greeting flow.
///
/// The counter is the only shared mutable state in the service; everything
/// else here is read-only after construction.
pub struct GreetingState {
    counter: AtomicU64,
    client: BookInfoClient,
    tokens: Option<TokenProvider>,
}

impl GreetingState {
    /// Build the state from settings. The token provider is only constructed
    /// when OAuth is enabled; otherwise the downstream call is anonymous.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = BookInfoClient::new(&settings.bookinfo)?;
        let tokens = if settings.oauth.enabled {
            Some(TokenProvider::from_settings(&settings.oauth)?)
        } else {
            None
        };

        Ok(Self {
            counter: AtomicU64::new(0),
            client,
            tokens,
        })
    }

    /// Hand out the next greeting id. Called exactly once per request, on
    /// every branch, so ids form the sequence 1, 2, 3, ... per process.
    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Acquire a token when configured, then count the downstream catalog.
    /// A token-step failure short-circuits before any downstream call.
    async fn book_count(&self) -> Result<usize, BookInfoError> {
        let token = match &self.tokens {
            Some(provider) => Some(provider.authorize().await?),
            None => None,
        };

        let books = self.client.fetch_books(token.as_ref()).await?;

        Ok(books.len())
    }
}

/// Greeting endpoint handler.
///
/// Always answers 200 with a Greeting body; downstream failures only change
/// the content text.
async fn greeting(State(state): State<Arc<GreetingState>>) -> Json<Greeting> {
    let outcome = state.book_count().await;

    match &outcome {
        Ok(count) => {
            tracing::info!(books = count, "retrieved book count from book-info service");
        }
        Err(err) => {
            tracing::error!(error = %err, "greeting degraded to fallback message");
        }
    }

    let content = compose_message(state.tokens.is_some(), outcome);
    let id = state.next_id();

    Json(Greeting { id, content })
}

/// Map the downstream outcome to the fixed message templates.
fn compose_message(authenticated: bool, outcome: Result<usize, BookInfoError>) -> String {
    match outcome {
        Ok(count) if count > 0 => {
            if authenticated {
                format!(
                    "Hello, authenticated Member! We have {} books available for you.",
                    count
                )
            } else {
                format!("Hello, dear Member! We have {} books available for you.", count)
            }
        }
        Ok(_) => {
            if authenticated {
                "Hello, authenticated Member! No books are currently available.".to_string()
            } else {
                "Hello, no books available for you.".to_string()
            }
        }
        Err(BookInfoError::Authorization { .. }) => {
            "Authentication failed - could not retrieve book information.".to_string()
        }
        Err(BookInfoError::Transport { .. }) | Err(BookInfoError::Protocol { .. }) => {
            "Sorry, we couldn't retrieve book information at the moment. \
             Authentication or service error occurred."
                .to_string()
        }
    }
}

/// Greeting module wiring the handler into the module lifecycle
pub struct GreetingModule {
    state: Arc<GreetingState>,
}

impl GreetingModule {
    pub fn new(state: Arc<GreetingState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for GreetingModule {
    fn name(&self) -> &'static str {
        "greeting"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            oauth_enabled = self.state.tokens.is_some(),
            "greeting module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/greeting", get(greeting))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/greeting": {
                    "get": {
                        "summary": "Counter-stamped greeting reflecting book availability",
                        "tags": ["Greeting"],
                        "responses": {
                            "200": {
                                "description": "Greeting payload; always 200, even on downstream failure",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Greeting"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Greeting": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Monotonically increasing request id"
                            },
                            "content": {
                                "type": "string",
                                "description": "Greeting text"
                            }
                        },
                        "required": ["id", "content"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "greeting module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "greeting module stopped");
        Ok(())
    }
}

/// Create a new instance of the greeting module
pub fn create_module(settings: &Settings) -> anyhow::Result<Arc<dyn Module>> {
    let state = Arc::new(GreetingState::from_settings(settings)?);

    Ok(Arc::new(GreetingModule::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_error() -> BookInfoError {
        // reqwest::Error cannot be constructed directly; a Protocol failure
        // exercises the same message arm.
        BookInfoError::Protocol {
            status: Some(503),
            detail: "unexpected status 503 Service Unavailable".to_string(),
        }
    }

    #[test]
    fn authenticated_message_includes_count() {
        assert_eq!(
            compose_message(true, Ok(7)),
            "Hello, authenticated Member! We have 7 books available for you."
        );
    }

    #[test]
    fn authenticated_message_for_empty_catalog() {
        assert_eq!(
            compose_message(true, Ok(0)),
            "Hello, authenticated Member! No books are currently available."
        );
    }

    #[test]
    fn anonymous_message_includes_count() {
        assert_eq!(
            compose_message(false, Ok(2)),
            "Hello, dear Member! We have 2 books available for you."
        );
    }

    #[test]
    fn anonymous_message_for_empty_catalog() {
        assert_eq!(compose_message(false, Ok(0)), "Hello, no books available for you.");
    }

    #[test]
    fn authorization_failure_has_distinct_message() {
        let outcome = Err(BookInfoError::Authorization {
            reason: "invalid_client".to_string(),
        });

        assert_eq!(
            compose_message(true, outcome),
            "Authentication failed - could not retrieve book information."
        );
    }

    #[test]
    fn service_failures_share_the_apology_message() {
        assert_eq!(
            compose_message(true, Err(transport_error())),
            "Sorry, we couldn't retrieve book information at the moment. \
             Authentication or service error occurred."
        );
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let state = GreetingState::from_settings(&Settings::default()).unwrap();

        assert_eq!(state.next_id(), 1);
        assert_eq!(state.next_id(), 2);
        assert_eq!(state.next_id(), 3);
    }
}
