//! Asynchronous request transport.
//!
//! A request is described by [`XhrArgs`]: a URL, how to decode the body, and
//! two one-shot continuations. The transport calls exactly one of them once
//! the request settles. [`HttpTransport`] runs the request on the tokio
//! runtime it was built in, so `send_xhr` itself never waits.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// How the response body is handed to the load continuation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandleAs {
    /// Parse the body as JSON
    #[default]
    Json,
    /// Pass the body through as a JSON string value
    Text,
}

/// Continuation for a settled request with a decoded body.
pub type LoadCallback = Box<dyn FnOnce(Value) + Send + 'static>;

/// Continuation for a failed request.
pub type ErrorCallback = Box<dyn FnOnce(TransportError) + Send + 'static>;

/// One request plus its continuations.
pub struct XhrArgs {
    pub url: String,
    pub handle_as: HandleAs,
    pub load: LoadCallback,
    pub error: ErrorCallback,
}

impl fmt::Debug for XhrArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XhrArgs")
            .field("url", &self.url)
            .field("handle_as", &self.handle_as)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no tokio runtime available for the transport")]
    NoRuntime,
}

/// Issues requests and reports the outcome through the continuations.
pub trait Transport: Send + Sync {
    fn send_xhr(&self, args: XhrArgs);
}

/// `reqwest`-backed transport resolving relative URLs against a base URL.
///
/// The base should end with `/` so that `SurveyAjax?...` lands next to it
/// rather than replacing its last path segment. An empty request URL resolves
/// to the base itself.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    runtime: Handle,
}

impl HttpTransport {
    /// Build a transport bound to the current tokio runtime.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                url: base_url.to_string(),
                source,
            })?;
        Self::with_client(client, base_url)
    }

    /// Same as [`HttpTransport::new`] with a caller-configured client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let runtime = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        Ok(Self {
            client,
            base_url,
            runtime,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a request URL as written by the page.
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(url)
            .map_err(|e| TransportError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn fetch(client: Client, url: Url, handle_as: HandleAs) -> Result<Value, TransportError> {
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        match handle_as {
            HandleAs::Json => serde_json::from_str(&body).map_err(|source| TransportError::Decode {
                url: url.to_string(),
                source,
            }),
            HandleAs::Text => Ok(Value::String(body)),
        }
    }
}

impl Transport for HttpTransport {
    fn send_xhr(&self, args: XhrArgs) {
        let XhrArgs {
            url,
            handle_as,
            load,
            error,
        } = args;
        let target = self.resolve(&url);
        let client = self.client.clone();

        self.runtime.spawn(async move {
            let outcome = match target {
                Ok(target) => {
                    debug!(url = %target, ?handle_as, "sending request");
                    Self::fetch(client, target, handle_as).await
                }
                Err(e) => Err(e),
            };
            match outcome {
                Ok(body) => load(body),
                Err(e) => {
                    warn!(error = %e, "request failed");
                    error(e);
                }
            }
        });
    }
}
