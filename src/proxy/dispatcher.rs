//! Concurrent fan-out of prepared requests to demand sources
//!
//! One tokio task is spawned per destination and the auction waits for all of
//! them. A failing destination is logged and reported as absent; it never
//! cancels or delays its siblings.

use crate::domain::{DemandSourceId, SourceResponse};
use crate::proxy::headers::{content_types, CONTENT_TYPE};
use crate::proxy::types::{DispatchError, TargetUrl};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sends one serialized bid request and returns the raw response body
#[async_trait]
pub trait BidTransport: Send + Sync {
    async fn post_json(&self, endpoint: &TargetUrl, body: Bytes) -> Result<Bytes, DispatchError>;
}

/// HTTP transport; relies on the client's default timeouts
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BidTransport for HttpTransport {
    async fn post_json(&self, endpoint: &TargetUrl, body: Bytes) -> Result<Bytes, DispatchError> {
        let response = self
            .client
            .post(endpoint.to_string())
            .header(CONTENT_TYPE.as_str(), content_types::APPLICATION_JSON)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// A prepared request bound for one demand source
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub source: DemandSourceId,
    pub endpoint: TargetUrl,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn BidTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn BidTransport>) -> Self {
        Self { transport }
    }

    /// Send every request concurrently and wait for all outcomes.
    ///
    /// Responses come back in the same order as `requests`.
    pub async fn dispatch(&self, requests: Vec<DispatchRequest>) -> Vec<SourceResponse> {
        let (sources, tasks): (Vec<_>, Vec<_>) = requests
            .into_iter()
            .map(|request| {
                let transport = Arc::clone(&self.transport);
                let task = tokio::spawn(async move {
                    transport.post_json(&request.endpoint, request.body).await
                });
                (request.source, task)
            })
            .unzip();

        join_all(tasks)
            .await
            .into_iter()
            .zip(sources)
            .map(|(joined, source)| match joined {
                Ok(Ok(body)) => {
                    info!(
                        source = %source,
                        body = %String::from_utf8_lossy(&body),
                        "Response received"
                    );
                    SourceResponse::received(source, body)
                }
                Ok(Err(e)) => {
                    warn!(source = %source, error = %e, "Downstream request failed");
                    SourceResponse::absent(source)
                }
                Err(e) => {
                    error!(source = %source, error = %e, "Downstream task did not complete");
                    SourceResponse::absent(source)
                }
            })
            .collect()
    }
}
