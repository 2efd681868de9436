//! Traced HTTP client that automatically injects trace context
//!
//! This module provides a wrapper around reqwest::Client that opens an
//! `outgoing_http` span per request and injects the `traceparent` header
//! for distributed tracing.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{field, Instrument, Level};

use crate::http::trace_context;

/// Errors produced by [`TracedClient`].
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be built or sent, or the connection failed.
    #[error("{method} {url}: transport error: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{method} {url}: HTTP {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
    },

    /// The response body did not match the expected JSON shape.
    #[error("{method} {url}: invalid response body: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A default header from [`ClientOptions`] is not a valid HTTP header.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
}

impl HttpError {
    /// Status code when the failure came from the server's answer.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Construction options for [`TracedClient::with_options`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    /// Headers sent with every request (e.g. API keys).
    pub default_headers: Vec<(String, String)>,
    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
}

/// A traced HTTP client that injects W3C trace context into outgoing requests.
#[derive(Clone, Debug)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Build a client with timeout / default headers applied.
    pub fn with_options(opts: &ClientOptions) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &opts.default_headers {
            let invalid = || HttpError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ua) = &opts.user_agent {
            builder = builder.user_agent(ua.clone());
        }

        let inner = builder.build().map_err(|source| HttpError::Transport {
            method: Method::GET,
            url: String::new(),
            source,
        })?;
        Ok(Self::new(inner))
    }

    /// Execute a built reqwest::Request inside an `outgoing_http` span,
    /// injecting a `traceparent` header. Any HTTP status is returned as-is.
    pub async fn execute(
        &self,
        mut req: reqwest::Request,
    ) -> Result<reqwest::Response, HttpError> {
        let url = req.url().to_string();
        let method = req.method().clone();

        let trace_id = trace_context::inject_trace_context(req.headers_mut());

        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %method,
            http.url = %url,
            http.status_code = field::Empty,
            trace_id = trace_id.as_deref().unwrap_or_default(),
            error = field::Empty,
            otel.kind = "client",
        );

        let result = self.inner.execute(req).instrument(span.clone()).await;

        match result {
            Ok(response) => {
                span.record("http.status_code", response.status().as_u16());
                if response.status().is_client_error() || response.status().is_server_error() {
                    span.record("error", true);
                }
                Ok(response)
            }
            Err(source) => {
                span.record("error", true);
                Err(HttpError::Transport {
                    method,
                    url,
                    source,
                })
            }
        }
    }

    fn build(
        &self,
        rb: reqwest::RequestBuilder,
        method: &Method,
        url: &str,
    ) -> Result<reqwest::Request, HttpError> {
        rb.build().map_err(|source| HttpError::Transport {
            method: method.clone(),
            url: url.to_string(),
            source,
        })
    }

    /// Send a request with an optional JSON body and require a 2xx status.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, HttpError> {
        let mut rb = self.inner.request(method.clone(), url);
        if let Some(body) = body {
            rb = rb.json(body);
        }
        let req = self.build(rb, &method, url)?;
        let response = self.execute(req).await?;
        ensure_success(method, response)
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        decode_json(Method::GET, response).await
    }

    /// POST a JSON body and decode a JSON answer.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, url, Some(body)).await?;
        decode_json(Method::POST, response).await
    }

    /// PUT a JSON body; the answer body is not inspected.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, HttpError> {
        self.send(Method::PUT, url, Some(body)).await
    }

    /// DELETE; the answer body is not inspected.
    pub async fn delete(&self, url: &str) -> Result<reqwest::Response, HttpError> {
        self.send::<()>(Method::DELETE, url, None).await
    }

    /// Get a reference to the underlying reqwest::Client for advanced usage
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

fn ensure_success(
    method: Method,
    response: reqwest::Response,
) -> Result<reqwest::Response, HttpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(HttpError::Status {
        method,
        url: response.url().to_string(),
        status,
    })
}

async fn decode_json<T: DeserializeOwned>(
    method: Method,
    response: reqwest::Response,
) -> Result<T, HttpError> {
    let url = response.url().to_string();
    response
        .json::<T>()
        .await
        .map_err(|source| HttpError::Decode {
            method,
            url,
            source,
        })
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
