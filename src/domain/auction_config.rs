//! Immutable configuration consumed by the auction core

use crate::config::AuctionSettings;
use crate::domain::slots::SlotTable;
use crate::error::{Error, Result};
use crate::proxy::types::TargetUrl;
use nutype::nutype;
use serde::Serialize;

/// Publisher identifier injected into bidder parameters
#[nutype(
    sanitize(trim),
    derive(Debug, Clone, PartialEq, Eq, Display, AsRef, Serialize)
)]
pub struct PublisherId(String);

/// Extension fields the secondary DSP expects at the top level of `ext`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DspExtension {
    pub ssp: String,
    pub spid: String,
}

/// Everything the auction needs, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct AuctionConfig {
    pub publisher_id: PublisherId,
    pub bidder_url: TargetUrl,
    pub dsp_url: TargetUrl,
    pub dsp_extension: DspExtension,
    pub slots: SlotTable,
}

impl AuctionConfig {
    pub fn from_settings(settings: &AuctionSettings) -> Result<Self> {
        let bidder_url = TargetUrl::try_new(settings.bidder_url.clone())
            .map_err(|e| Error::invalid_configuration("auction.bidder_url", e.to_string()))?;
        let dsp_url = TargetUrl::try_new(settings.dsp_url.clone())
            .map_err(|e| Error::invalid_configuration("auction.dsp_url", e.to_string()))?;
        let slots = SlotTable::from_raw(
            settings.slot_mappings.clone(),
            settings.fallback_slots.clone(),
        )?;

        Ok(Self {
            publisher_id: PublisherId::new(settings.publisher_id.clone()),
            bidder_url,
            dsp_url,
            dsp_extension: DspExtension {
                ssp: settings.dsp_ssp.clone(),
                spid: settings.dsp_spid.clone(),
            },
            slots,
        })
    }
}
