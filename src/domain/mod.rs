//! Auction domain: OpenRTB records, ad classification, slot lookup and
//! bid arbitration

pub mod ad_type;
pub mod arbitration;
pub mod auction_config;
pub mod openrtb;
pub mod slots;

pub use ad_type::AdType;
pub use arbitration::{arbitrate, ArbitrationOutcome, BidPrice, DemandSourceId, SourceResponse};
pub use auction_config::{AuctionConfig, DspExtension, PublisherId};
pub use openrtb::BidRequest;
pub use slots::{SlotId, SlotTable};
