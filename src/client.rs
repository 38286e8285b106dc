// HTTP snapshot source for the watch client (GET /api/system)

use crate::error::PollError;
use crate::models::Snapshot;
use crate::poller::SnapshotSource;
use crate::version::USER_AGENT;
use async_trait::async_trait;
use axum::http::{Request, Uri, header};
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

pub struct HttpSource {
    client: Client<HttpConnector, Empty<Bytes>>,
    uri: Uri,
    request_timeout: Duration,
}

impl HttpSource {
    pub fn new(url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        let uri: Uri = url
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid url {}: {}", url, e))?;
        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            client,
            uri,
            request_timeout,
        })
    }

    async fn get(&self) -> Result<Snapshot, PollError> {
        let request = Request::get(self.uri.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| PollError::Transport(format!("building request: {}", e)))?;
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| PollError::Transport(format!("GET {}: {}", self.uri, e)))?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| PollError::Transport(format!("reading body: {}", e)))?
            .to_bytes();
        if !status.is_success() {
            let detail = serde_json::from_slice::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
                .unwrap_or_default();
            let message = format!("{} returned {} {}", self.uri, status, detail);
            return Err(PollError::Transport(message.trim_end().to_string()));
        }
        serde_json::from_slice(&body)
            .map_err(|e| PollError::Transport(format!("decoding snapshot: {}", e)))
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Snapshot, PollError> {
        tokio::time::timeout(self.request_timeout, self.get())
            .await
            .map_err(|_| {
                PollError::Transport(format!(
                    "GET {} timed out after {:?}",
                    self.uri, self.request_timeout
                ))
            })?
    }
}
