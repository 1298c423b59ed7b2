//! Typed OpenRTB records for the fields the auction core reads or writes
//!
//! Only `imp[].video/banner/native`, `imp[].ext.prebid.bidder`, `app.bundle`
//! and the top-level `ext` are modelled. Every other key is carried through
//! the `rest` maps untouched, and a known key whose value has an unexpected
//! JSON shape is kept verbatim as [`Shaped::Other`], so a request survives
//! parse → mutate → serialize without losing content.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A value that either has the expected shape or is kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    Typed(T),
    Other(Value),
}

impl<T> Shaped<T> {
    pub fn as_typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Other(_) => None,
        }
    }
}

impl<T: Default> Shaped<T> {
    /// Take the typed value out of `slot`, or a fresh default when the slot is
    /// empty or holds a value of the wrong shape.
    pub fn take_typed(slot: &mut Option<Shaped<T>>) -> T {
        match slot.take() {
            Some(Self::Typed(value)) => value,
            _ => T::default(),
        }
    }
}

/// Keeps a key that is present with a `null` value instead of folding it into `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Inbound auction request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub imp: Option<Shaped<Vec<Shaped<Impression>>>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub app: Option<Shaped<App>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub ext: Option<Shaped<Map<String, Value>>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl BidRequest {
    /// Parse a raw request body.
    ///
    /// The body is read into a [`Value`] first so a repeated key keeps its
    /// last value instead of failing the typed records.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        serde_json::from_value(value)
    }

    /// `app.bundle` when it is present and a string
    pub fn bundle(&self) -> Option<&str> {
        self.app
            .as_ref()
            .and_then(Shaped::as_typed)
            .and_then(|app| app.bundle.as_ref())
            .and_then(Shaped::as_typed)
            .map(String::as_str)
    }

    /// Impressions that are proper objects, in request order
    pub fn impressions(&self) -> impl Iterator<Item = &Impression> {
        self.imp
            .as_ref()
            .and_then(Shaped::as_typed)
            .into_iter()
            .flatten()
            .filter_map(Shaped::as_typed)
    }

    /// Mutable access to the impressions that are proper objects.
    ///
    /// Returns `None` when `imp` is missing or not an array.
    pub fn impressions_mut(&mut self) -> Option<impl Iterator<Item = &mut Impression>> {
        match self.imp.as_mut() {
            Some(Shaped::Typed(list)) => Some(list.iter_mut().filter_map(|slot| match slot {
                Shaped::Typed(imp) => Some(imp),
                Shaped::Other(_) => None,
            })),
            _ => None,
        }
    }
}

/// One impression inside `imp`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Impression {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub video: Option<Value>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub banner: Option<Value>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub native: Option<Value>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub ext: Option<Shaped<ImpExt>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `imp[].ext`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpExt {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub prebid: Option<Shaped<PrebidExt>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `imp[].ext.prebid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrebidExt {
    /// Bidder name → bidder parameters
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub bidder: Option<Shaped<Map<String, Value>>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `app`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct App {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle: Option<Shaped<String>>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Location of the price the auction compares: first seat, first bid
const FIRST_BID_POINTER: &str = "/seatbid/0/bid/0";

/// Price of the first bid of the first seat in a downstream response.
///
/// Only that path is read; later seats and bids may have any shape. Returns
/// `None` when the body is not JSON or has no first bid, and `Some(0.0)` when
/// the first bid carries no numeric `price`.
pub fn first_bid_price(body: &[u8]) -> Option<f64> {
    let response: Value = serde_json::from_slice(body).ok()?;
    let bid = response.pointer(FIRST_BID_POINTER)?;
    Some(bid.get("price").and_then(Value::as_f64).unwrap_or_default())
}
