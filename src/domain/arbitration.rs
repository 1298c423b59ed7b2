//! Highest-bid selection across demand source responses

use crate::domain::openrtb::first_bid_price;
use bytes::Bytes;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Bid price in CPM; anything that is not a positive finite number is 0
#[nutype(
    sanitize(with = |price: f64| if price.is_finite() && price > 0.0 { price } else { 0.0 }),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize)
)]
pub struct BidPrice(f64);

impl BidPrice {
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.into_inner() == 0.0
    }

    /// Price of the first bid of the first seat, or zero when the body is not
    /// a bid response of that shape.
    pub fn from_response_body(body: &[u8]) -> Self {
        first_bid_price(body)
            .map(Self::new)
            .unwrap_or_else(Self::zero)
    }
}

/// Downstream demand sources, in tie-break priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandSourceId {
    PubMatic,
    Jio,
}

impl fmt::Display for DemandSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PubMatic => f.write_str("PubMatic"),
            Self::Jio => f.write_str("Jio"),
        }
    }
}

/// What one destination returned; `body` is `None` when the call failed
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResponse {
    pub source: DemandSourceId,
    pub body: Option<Bytes>,
}

impl SourceResponse {
    pub fn received(source: DemandSourceId, body: Bytes) -> Self {
        Self {
            source,
            body: Some(body),
        }
    }

    pub fn absent(source: DemandSourceId) -> Self {
        Self { source, body: None }
    }

    pub fn price(&self) -> BidPrice {
        self.body
            .as_deref()
            .map(BidPrice::from_response_body)
            .unwrap_or_else(BidPrice::zero)
    }
}

/// Result of one auction
#[derive(Debug, Clone, PartialEq)]
pub enum ArbitrationOutcome {
    Won {
        source: DemandSourceId,
        price: BidPrice,
        body: Bytes,
    },
    NoBid,
}

impl ArbitrationOutcome {
    pub fn winner(&self) -> Option<DemandSourceId> {
        match self {
            Self::Won { source, .. } => Some(*source),
            Self::NoBid => None,
        }
    }
}

/// Pick the response carrying the highest first-bid price.
///
/// Responses are considered in priority order and a later one only replaces
/// the current leader when its price is strictly higher, so earlier sources
/// win ties. With every price at zero the outcome is `NoBid`.
pub fn arbitrate(responses: Vec<SourceResponse>) -> ArbitrationOutcome {
    let mut prices = Vec::with_capacity(responses.len());
    let mut best: Option<(DemandSourceId, BidPrice, Bytes)> = None;

    for response in responses {
        let price = response.price();
        debug!(source = %response.source, price = %price, "Parsed downstream bid");
        prices.push((response.source, price));

        let leading = best
            .as_ref()
            .map(|(_, leader, _)| *leader)
            .unwrap_or_else(BidPrice::zero);
        if price > leading {
            if let Some(body) = response.body {
                best = Some((response.source, price, body));
            }
        }
    }

    let outcome = match best {
        Some((source, price, body)) => ArbitrationOutcome::Won {
            source,
            price,
            body,
        },
        None => ArbitrationOutcome::NoBid,
    };

    let winner = outcome
        .winner()
        .map(|source| source.to_string())
        .unwrap_or_else(|| "None".to_string());
    info!(bids = ?prices, winner = %winner, "Final bids");

    outcome
}
