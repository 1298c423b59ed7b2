//! Main auction service implementation
//!
//! The `AuctionService` is the entry point for the bid proxy. For every
//! inbound OpenRTB request it:
//!
//! 1. parses the body into a [`BidRequest`] (malformed JSON is rejected here,
//!    before any downstream call),
//! 2. lets every registered [`DemandSource`](crate::demand::DemandSource)
//!    build its own rewritten copy,
//! 3. dispatches all copies concurrently and waits for every outcome,
//! 4. arbitrates on the first bid price of each response.
//!
//! ## Service Lifecycle
//!
//! ```rust,ignore
//! use rtb_arbiter::domain::AuctionConfig;
//! use rtb_arbiter::proxy::{AuctionService, ProxyConfig};
//!
//! let service = AuctionService::new(&auction_config, ProxyConfig::default())?;
//! let router = service.into_router();
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use crate::demand::DemandRegistry;
use crate::domain::{arbitrate, AdType, ArbitrationOutcome, AuctionConfig, BidRequest};
use crate::proxy::dispatcher::{BidTransport, DispatchRequest, Dispatcher, HttpTransport};
use crate::proxy::error_response::{extract_request_id, standard_error_response};
use crate::proxy::headers::{content_types, paths, CONTENT_TYPE};
use crate::proxy::middleware_stack::ProxyMiddlewareStack;
use crate::proxy::types::*;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Bundle name logged when the request carries no `app.bundle`
const UNKNOWN_BUNDLE: &str = "UNKNOWN_BUNDLE";

/// Fan-out/merge auction over the registered demand sources
pub struct AuctionService {
    registry: DemandRegistry,
    dispatcher: Dispatcher,
    proxy_config: ProxyConfig,
}

impl AuctionService {
    /// Create a service that talks to the configured endpoints over HTTP
    pub fn new(config: &AuctionConfig, proxy_config: ProxyConfig) -> crate::Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(
            config,
            proxy_config,
            Arc::new(transport),
        ))
    }

    /// Create a service with a custom transport
    pub fn with_transport(
        config: &AuctionConfig,
        proxy_config: ProxyConfig,
        transport: Arc<dyn BidTransport>,
    ) -> Self {
        Self {
            registry: DemandRegistry::from_config(config),
            dispatcher: Dispatcher::new(transport),
            proxy_config,
        }
    }

    /// Run one auction over a raw request body
    #[instrument(skip(self, body), fields(body_size = body.len()))]
    pub async fn run_auction(&self, body: &[u8]) -> ProxyResult<ArbitrationOutcome> {
        let request = BidRequest::from_slice(body).map_err(|e| {
            warn!(error = %e, "Invalid JSON in request");
            ProxyError::MalformedRequest(e)
        })?;

        info!(
            bundle = request.bundle().unwrap_or(UNKNOWN_BUNDLE),
            "Incoming request"
        );
        for ad_type in request.impressions().map(AdType::classify) {
            info!(ad_type = %ad_type, "Impression type detected");
        }

        let prepared = self
            .registry
            .sources()
            .iter()
            .map(|source| -> ProxyResult<DispatchRequest> {
                Ok(DispatchRequest {
                    source: source.id(),
                    endpoint: source.endpoint().clone(),
                    body: source.prepare_request(&request)?,
                })
            })
            .collect::<ProxyResult<Vec<_>>>()?;

        let responses = self.dispatcher.dispatch(prepared).await;

        Ok(arbitrate(responses))
    }

    /// Create an Axum router for the auction service with middleware
    pub fn into_router(self) -> Router {
        let router = Router::new()
            .route(
                paths::AUCTION,
                post(auction_handler).fallback(method_not_allowed_handler),
            )
            .route(paths::HEALTH, get(health_handler))
            .with_state(Arc::new(self));

        ProxyMiddlewareStack::new().apply_to_router(router)
    }
}

/// Axum handler for the OpenRTB auction endpoint
async fn auction_handler(
    State(service): State<Arc<AuctionService>>,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let max_size = service.proxy_config.max_request_size;

    let body = http_body_util::Limited::new(request.into_body(), *max_size.as_ref())
        .collect()
        .await
        .map_err(|e| {
            if e.is::<http_body_util::LengthLimitError>() {
                ProxyError::RequestTooLarge {
                    size: BodySize::from(*max_size.as_ref() + 1),
                    max_size,
                }
            } else {
                ProxyError::Internal(format!("Body collection error: {e}"))
            }
        })?
        .to_bytes();

    match service.run_auction(&body).await? {
        ArbitrationOutcome::Won { body, .. } => Ok((
            [(CONTENT_TYPE, content_types::APPLICATION_JSON)],
            body,
        )
            .into_response()),
        ArbitrationOutcome::NoBid => {
            warn!("No valid bids received from either DSP");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// Anything but POST on the auction path
async fn method_not_allowed_handler(headers: HeaderMap) -> Response {
    standard_error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        extract_request_id(&headers).as_deref(),
    )
}

/// Error conversion for Axum responses using standardized format
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        use crate::proxy::error_response::ErrorResponseExt;

        let status = self.status_code();
        let error_response = self.to_error_response();
        error_response.into_response_with_status(status)
    }
}

/// Health check handler
async fn health_handler() -> &'static str {
    "OK"
}
