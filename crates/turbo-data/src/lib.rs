//! HTTP client utilities for TurboCommerce.
//!
//! A small builder API over a pluggable [`Transport`]: Spin's outbound HTTP
//! inside WASM components, `reqwest` natively (`native` feature), and a
//! scripted [`MockTransport`] for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::{FetchClient, Multipart};
//!
//! let client = FetchClient::new().with_base_url("https://admin.example.com/api");
//!
//! let schema: serde_json::Value = client
//!     .get("/categories/phones/attributes")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//!
//! let form = Multipart::new().text("name", "Phone X");
//! let receipt: serde_json::Value = client
//!     .post("/products")
//!     .multipart(&form)
//!     .idempotency_key("3f0c...")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod multipart;
mod request;
mod response;
mod transport;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use error::FetchError;
pub use multipart::Multipart;
pub use request::{Method, RequestBuilder, IDEMPOTENCY_KEY_HEADER};
pub use response::Response;
#[cfg(feature = "native")]
pub use transport::ReqwestTransport;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;
pub use transport::{MockTransport, Transport, Unconfigured};

fn default_transport() -> Arc<dyn Transport> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(SpinTransport)
    }
    #[cfg(all(not(target_arch = "wasm32"), feature = "native"))]
    {
        Arc::new(ReqwestTransport::default())
    }
    #[cfg(all(not(target_arch = "wasm32"), not(feature = "native")))]
    {
        Arc::new(Unconfigured)
    }
}

/// HTTP client for making outbound requests.
///
/// Holds the base URL, default headers and timeout applied to every request
/// it builds. Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a client over the platform's default transport.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            timeout: None,
            transport: default_transport(),
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    pub fn multipart(mut self, form: &Multipart) -> Self {
        self.builder = self.builder.multipart(form);
        self
    }

    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.builder = self.builder.idempotency_key(key);
        self
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// The request as built so far.
    pub fn build(self) -> RequestBuilder {
        self.builder
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        tracing::debug!(
            method = self.builder.method().as_str(),
            url = self.builder.url(),
            "sending request"
        );
        self.transport.send(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Multipart, Response, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mock_client() -> (FetchClient, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let client = FetchClient::new()
            .with_base_url("https://admin.example.com/api/")
            .with_default_header("X-Tenant", "acme")
            .with_timeout(Duration::from_secs(5))
            .with_transport(mock.clone());
        (client, mock)
    }

    #[tokio::test]
    async fn test_defaults_applied_to_requests() {
        let (client, mock) = mock_client();
        mock.push_json(200, &json!({ "ok": true }));

        let resp = client.get("/products/p-1").send().await.unwrap();
        assert!(resp.is_success());

        let sent = &mock.requests()[0];
        assert_eq!(sent.method(), Method::Get);
        assert_eq!(sent.url(), "https://admin.example.com/api/products/p-1");
        assert_eq!(sent.header_value("x-tenant"), Some("acme"));
        assert_eq!(sent.timeout_duration(), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_absolute_url_bypasses_base() {
        let (client, mock) = mock_client();
        mock.push_json(200, &json!({}));

        client.get("https://cdn.example.com/a.png").send().await.unwrap();
        assert_eq!(mock.requests()[0].url(), "https://cdn.example.com/a.png");
    }

    #[tokio::test]
    async fn test_multipart_post_with_idempotency_key() {
        let (client, mock) = mock_client();
        mock.push_json(201, &json!({ "productId": "p-9" }));

        let form = Multipart::with_boundary("b1").text("name", "Phone X");
        let resp = client
            .post("products")
            .multipart(&form)
            .idempotency_key("key-1")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status, 201);

        let sent = &mock.requests()[0];
        assert_eq!(sent.header_value(IDEMPOTENCY_KEY_HEADER), Some("key-1"));
        assert_eq!(
            sent.header_value("content-type"),
            Some("multipart/form-data; boundary=b1")
        );
    }

    #[tokio::test]
    async fn test_transport_errors_surface() {
        let (client, mock) = mock_client();
        mock.push_response(Err(FetchError::Timeout));

        let err = client.get("/x").send().await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_unconfigured_transport_fails() {
        let client = FetchClient::new().with_transport(Arc::new(Unconfigured));
        let err = client.get("https://example.com").send().await.unwrap_err();
        assert!(matches!(err, FetchError::RequestError(_)));
    }
}
