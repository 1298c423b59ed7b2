//! Demand sources the auction fans out to
//!
//! Each [`DemandSource`] owns the rewrite its destination expects and the
//! endpoint it is sent to. The [`DemandRegistry`] keeps them in priority
//! order; that order is also the tie-break order used by arbitration.

pub mod jio;
pub mod pubmatic;

use crate::domain::{AuctionConfig, BidRequest, DemandSourceId};
use crate::proxy::types::{ProxyResult, TargetUrl};
use bytes::Bytes;
use std::sync::Arc;

pub use jio::JioSource;
pub use pubmatic::PubmaticSource;

/// A downstream bidder that receives its own variant of the auction request
pub trait DemandSource: Send + Sync {
    fn id(&self) -> DemandSourceId;

    fn endpoint(&self) -> &TargetUrl;

    /// Rewrite a private copy of the inbound request for this destination
    fn transform(&self, request: &mut BidRequest) -> ProxyResult<()>;

    /// Clone, rewrite and serialize the request for this destination
    fn prepare_request(&self, request: &BidRequest) -> ProxyResult<Bytes> {
        let mut outbound = request.clone();
        self.transform(&mut outbound)?;
        Ok(Bytes::from(serde_json::to_vec(&outbound)?))
    }
}

/// Demand sources in priority order
#[derive(Default, Clone)]
pub struct DemandRegistry {
    sources: Vec<Arc<dyn DemandSource>>,
}

impl DemandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// PubMatic through Prebid Server first, then the Jio DSP
    pub fn from_config(config: &AuctionConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PubmaticSource::new(
            config.bidder_url.clone(),
            config.publisher_id.clone(),
            config.slots.clone(),
        )));
        registry.register(Arc::new(JioSource::new(
            config.dsp_url.clone(),
            config.dsp_extension.clone(),
        )));
        registry
    }

    pub fn register(&mut self, source: Arc<dyn DemandSource>) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[Arc<dyn DemandSource>] {
        &self.sources
    }
}
