//! Thin `reqwest` wrapper shared by every endpoint call.
//!
//! Attaches the bearer token of the current session, enforces the request
//! timeout, and turns non-success statuses into [`MovieManiaError::Api`]. Bodies
//! are returned as untyped JSON so the normalizer can accept legacy shapes.

use crate::domain::error::{MovieManiaError, Result};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Shared slot holding the access token attached to outgoing requests.
pub type TokenStore = Arc<RwLock<Option<String>>>;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    token_store: TokenStore,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Replaces the access token; `None` stops sending `Authorization`.
    pub fn set_token(&self, token: Option<String>) {
        *self.token_store.write() = token;
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token_store.read().clone()
    }

    pub async fn get(&self, url: &Url, query: &[(&str, String)]) -> Result<Value> {
        self.execute(self.client.get(url.clone()).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, url: &Url, query: &[(&str, String)], body: Option<&B>) -> Result<Value> {
        let mut request = self.client.post(url.clone()).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    pub async fn delete(&self, url: &Url, query: &[(&str, String)]) -> Result<Value> {
        self.execute(self.client.delete(url.clone()).query(query)).await
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %url, "request rejected");
            return Err(api_error(status, &body));
        }

        tracing::debug!(status = status.as_u16(), path = %url, bytes = body.len(), "request completed");
        Ok(parse_body(&body))
    }
}

/// Builds an API error, preferring the server's `message` field over the raw body.
fn api_error(status: StatusCode, body: &str) -> MovieManiaError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.trim().to_string()
            }
        });

    MovieManiaError::Api {
        status_code: status.as_u16(),
        message,
    }
}

/// Parses a success body leniently: empty or non-JSON bodies become `null`.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "response body is not JSON");
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_message_field() {
        let err = api_error(StatusCode::UNAUTHORIZED, r#"{"success":false,"message":"token expired"}"#);
        match err {
            MovieManiaError::Api { status_code, message } => {
                assert_eq!(status_code, 401);
                assert_eq!(message, "token expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_reason_phrase() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert!(matches!(
            err,
            MovieManiaError::Api { status_code: 500, ref message } if message == "Internal Server Error"
        ));
    }

    #[test]
    fn lenient_body_parsing() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("<html>"), Value::Null);
        assert_eq!(parse_body(r#"{"movies":[]}"#)["movies"], Value::Array(vec![]));
    }

    #[test]
    fn token_slot_is_shared_between_clones() {
        let client = HttpClient::new(Duration::from_secs(1)).unwrap();
        let clone = client.clone();
        assert_eq!(client.token(), None);
        client.set_token(Some("abc".into()));
        assert_eq!(clone.token().as_deref(), Some("abc"));
        clone.set_token(None);
        assert_eq!(client.token(), None);
    }
}
