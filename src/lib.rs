//! RTB Arbiter - a two-way real-time bidding proxy
//!
//! Each inbound OpenRTB auction request is rewritten for two demand sources
//! (a Prebid-style bidder that needs PubMatic parameters per impression and a
//! DSP that expects its own top-level extension), both copies are sent
//! concurrently, and the response carrying the higher first bid is returned
//! to the caller byte for byte.

pub mod application;
pub mod config;
pub mod demand;
pub mod domain;
pub mod error;
pub mod proxy;

pub use application::Application;
pub use error::{Error, Result};
