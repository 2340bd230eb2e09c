//! HTTP transport to the query API.
//!
//! [`Transport`] is the seam between the data source and the network: the
//! production implementation is [`HyperTransport`], tests substitute an
//! in-memory fake. Both exchange JSON values only.

use std::future::Future;

use bytes::Bytes;
use http::{header, Method, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;

use crate::error::TransportError;

/// JSON request/response exchange with the query API.
///
/// Paths are relative to the data source base URL. Non-2xx responses must be
/// returned as [`TransportError::Status`] so that upstream error payloads can
/// be surfaced.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    fn get_json(&self, path: &str) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// Plain-HTTP transport over `hyper`. Intended for the host's data source
/// proxy, which adds credentials and terminates TLS upstream.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
}

impl HyperTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn uri(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<Value, TransportError> {
        let method = request.method().clone();
        let uri = request.uri().clone();

        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        tracing::debug!(%method, %uri, status = status.as_u16(), bytes = bytes.len(), "query api response");

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Transport for HyperTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.uri(path))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::from(serde_json::to_vec(body)?)))?;
        self.send(request).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.uri(path))
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))?;
        self.send(request).await
    }
}
