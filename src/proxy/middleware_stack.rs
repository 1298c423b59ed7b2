//! Middleware stack builder for clean composition

use crate::proxy::middleware::*;
use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;

/// Builder for composing the proxy middleware stack
#[derive(Debug, Clone, Default)]
pub struct ProxyMiddlewareStack;

impl ProxyMiddlewareStack {
    pub fn new() -> Self {
        Self
    }

    /// Apply the complete middleware stack to a router
    ///
    /// Outer to inner:
    /// 1. Request ID generation/propagation
    /// 2. Logging (with request ID)
    /// 3. Failed-request logging
    pub fn apply_to_router<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(from_fn(logging_middleware))
                .layer(from_fn(error_handling_middleware)),
        )
    }
}
