//! HTTP boundary and fan-out machinery for the auction
//!
//! - Service: axum router, body limits, outcome → HTTP mapping
//! - Dispatcher: one task per demand source, joined before arbitration

pub mod dispatcher;
pub mod error_response;
pub mod headers;
pub mod middleware;
pub mod middleware_stack;
pub mod service;
pub mod types;

#[cfg(test)]
mod test_utils;



pub use dispatcher::{BidTransport, Dispatcher, HttpTransport};
pub use service::AuctionService;
pub use types::{ProxyConfig, ProxyError, ProxyResult};
