//! Request primitives and the `{"value": ...}` response envelope.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Raw request/response exchange with the automation server. Paths are
/// relative to the server base; the driver prepends the session scope.
/// Implementations own connection management, timeouts, and retries —
/// nothing above this trait retries or reinterprets a failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Bytes>;
    async fn post(&self, path: &str, payload: Option<Value>) -> Result<Bytes>;
    async fn delete(&self, path: &str) -> Result<Bytes>;
}

/// HTTP transport against a WebDriver base URL.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("build reqwest client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_response(path: &str, resp: reqwest::Response) -> Result<Bytes> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                path: path.to_string(),
                status,
                body,
            });
        }
        Ok(resp.bytes().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Bytes> {
        debug!(path, "GET");
        let resp = self.http.get(self.url(path)).send().await?;
        Self::read_response(path, resp).await
    }

    async fn post(&self, path: &str, payload: Option<Value>) -> Result<Bytes> {
        debug!(path, "POST");
        let mut req = self.http.post(self.url(path));
        if let Some(payload) = &payload {
            req = req.json(payload);
        }
        let resp = req.send().await?;
        Self::read_response(path, resp).await
    }

    async fn delete(&self, path: &str) -> Result<Bytes> {
        debug!(path, "DELETE");
        let resp = self.http.delete(self.url(path)).send().await?;
        Self::read_response(path, resp).await
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Option<Value>,
}

/// Unwraps `{"value": ...}`. An absent or null value means "no payload" and
/// decodes to `None`; anything else must decode into `T`.
pub(crate) fn decode_value<T: DeserializeOwned>(raw: &[u8]) -> Result<Option<T>> {
    let envelope: Envelope = serde_json::from_slice(raw)?;
    match envelope.value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Unwraps `{"value": ...}` where the value is mandatory.
pub(crate) fn decode_reply<T: DeserializeOwned>(raw: &[u8]) -> Result<T> {
    #[derive(Deserialize)]
    struct Reply<T> {
        value: T,
    }
    let reply: Reply<T> = serde_json::from_slice(raw)?;
    Ok(reply.value)
}
