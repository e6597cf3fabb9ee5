//! Authenticated HTTP client for the store backend.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::HttpError;
use crate::config::ClientConfig;
use crate::session::SessionManager;

/// Store backend REST client.
///
/// Cheap to clone; clones share the connection pool and the session.
///
/// # Authentication
///
/// The bearer token is read from the injected [`SessionManager`] at the time
/// each request is sent, so a login or logout takes effect on the very next
/// request without rebuilding the client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Error body shape used by the backend (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.inner.session
    }

    /// Send a request and return the raw JSON response.
    ///
    /// `body` is serialized as JSON. An empty response body yields
    /// `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Status` for any non-2xx response,
    /// `HttpError::RateLimited` for 429, `HttpError::Network` when no
    /// response arrives, and `HttpError::Schema` when the body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        self.send(method, path, &[], body).await
    }

    /// `GET` a path and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`]. A body that does not match `T` is
    /// `HttpError::Schema`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let value = self.get_value(path, &[]).await?;
        decode(value)
    }

    /// `GET` a path with query parameters and return the raw JSON.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_value(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, HttpError> {
        self.send::<Value>(Method::GET, path, query, None).await
    }

    /// `POST` a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let value = self.send(Method::POST, path, &[], Some(body)).await?;
        decode(value)
    }

    /// `POST` without a body (used by block/unblock style actions).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_empty(&self, path: &str) -> Result<Value, HttpError> {
        self.send::<Value>(Method::POST, path, &[], None).await
    }

    /// `PUT` a JSON body and return the raw JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Value, HttpError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE` a path, discarding any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<(), HttpError> {
        self.send::<Value>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Value, HttpError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(path, query)?;
        let mut request = self.inner.client.request(method, url);

        if let Some(token) = self.inner.session.token().await {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            warn!(retry_after, "Backend rate limited the request");
            return Err(HttpError::RateLimited(retry_after));
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error.or(body.message))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            debug!(status = status.as_u16(), %message, "Backend returned an error");
            return Err(HttpError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| HttpError::Schema(format!("response is not valid JSON: {e}")))
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, HttpError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, HttpError> {
    serde_json::from_value(value).map_err(|e| HttpError::Schema(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        let config = ClientConfig::for_api_url(base).unwrap();
        ApiClient::new(&config, Arc::new(SessionManager::in_memory())).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = client("http://localhost:8080/");
        let url = client.url("/admin/products", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/admin/products");
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let client = client("https://shop.test/api");
        let url = client.url("/admin/users/3/block", &[]).unwrap();
        assert_eq!(url.as_str(), "https://shop.test/api/admin/users/3/block");
    }

    #[test]
    fn test_url_encodes_query() {
        let client = client("http://localhost:8080");
        let url = client
            .url("/admin/orders", &[("status", "on hold&x=1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/admin/orders?status=on+hold%26x%3D1"
        );
    }

    #[test]
    fn test_debug_does_not_expose_session() {
        let client = client("http://localhost:8080");
        let debug = format!("{client:?}");
        assert!(debug.contains("localhost:8080"));
        assert!(!debug.contains("session"));
    }
}
