//! PubMatic through Prebid Server
//!
//! Every impression gets `ext.prebid.bidder.pubmatic = {publisherId, adSlot}`,
//! with the slot looked up from the app bundle and the impression's ad type.

use crate::demand::DemandSource;
use crate::domain::openrtb::{BidRequest, Shaped};
use crate::domain::{AdType, DemandSourceId, PublisherId, SlotTable};
use crate::proxy::types::{ProxyResult, TargetUrl};
use serde::Serialize;
use tracing::{info, warn};

/// Key under `ext.prebid.bidder` that Prebid Server routes to PubMatic
pub const BIDDER_KEY: &str = "pubmatic";

/// Bidder parameters Prebid Server's PubMatic adapter expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PubmaticParams {
    pub publisher_id: String,
    pub ad_slot: String,
}

pub struct PubmaticSource {
    endpoint: TargetUrl,
    publisher_id: PublisherId,
    slots: SlotTable,
}

impl PubmaticSource {
    pub fn new(endpoint: TargetUrl, publisher_id: PublisherId, slots: SlotTable) -> Self {
        Self {
            endpoint,
            publisher_id,
            slots,
        }
    }
}

impl DemandSource for PubmaticSource {
    fn id(&self) -> DemandSourceId {
        DemandSourceId::PubMatic
    }

    fn endpoint(&self) -> &TargetUrl {
        &self.endpoint
    }

    fn transform(&self, request: &mut BidRequest) -> ProxyResult<()> {
        inject_bidder_params(request, &self.publisher_id, &self.slots)
    }
}

/// Inject PubMatic bidder parameters into every impression that is an object.
///
/// Impressions of any other shape are left alone, and a request without an
/// `imp` array passes through unchanged. Sibling bidders under
/// `ext.prebid.bidder` are preserved; an existing `pubmatic` entry is replaced.
pub fn inject_bidder_params(
    request: &mut BidRequest,
    publisher_id: &PublisherId,
    slots: &SlotTable,
) -> ProxyResult<()> {
    let bundle = request.bundle().map(str::to_owned);

    let Some(impressions) = request.impressions_mut() else {
        warn!("No 'imp' list found in request");
        return Ok(());
    };

    for imp in impressions {
        let ad_type = AdType::classify(imp);
        let ad_slot = slots
            .resolve(bundle.as_deref(), ad_type)
            .map(ToString::to_string)
            .unwrap_or_default();

        let params = serde_json::to_value(PubmaticParams {
            publisher_id: publisher_id.to_string(),
            ad_slot: ad_slot.clone(),
        })?;

        let mut ext = Shaped::take_typed(&mut imp.ext);
        let mut prebid = Shaped::take_typed(&mut ext.prebid);
        let mut bidder = Shaped::take_typed(&mut prebid.bidder);

        bidder.insert(BIDDER_KEY.to_string(), params);

        prebid.bidder = Some(Shaped::Typed(bidder));
        ext.prebid = Some(Shaped::Typed(prebid));
        imp.ext = Some(Shaped::Typed(ext));

        info!(ad_type = %ad_type, ad_slot = %ad_slot, "Injected PubMatic bidder params");
    }

    Ok(())
}
