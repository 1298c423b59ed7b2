//! Inventory slot lookup per app bundle and ad type

use crate::domain::ad_type::AdType;
use nutype::nutype;
use std::collections::HashMap;
use thiserror::Error;

/// Inventory identifier a destination uses to target a placement
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Hash, Display, AsRef, Serialize, Deserialize)
)]
pub struct SlotId(String);

#[derive(Error, Debug, PartialEq)]
pub enum SlotTableError {
    #[error("Empty bundle identifier in slot mappings")]
    EmptyBundle,

    #[error("Empty slot for bundle '{bundle}' and ad type '{ad_type}'")]
    EmptySlot { bundle: String, ad_type: AdType },

    #[error("Empty fallback slot for ad type '{0}'")]
    EmptyFallback(AdType),
}

/// Read-only bundle → ad type → slot table with a per-type fallback
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    mappings: HashMap<String, HashMap<AdType, SlotId>>,
    fallback: HashMap<AdType, SlotId>,
}

impl SlotTable {
    /// Build a table from raw configuration values
    pub fn from_raw(
        mappings: HashMap<String, HashMap<AdType, String>>,
        fallback: HashMap<AdType, String>,
    ) -> Result<Self, SlotTableError> {
        let mappings = mappings
            .into_iter()
            .map(|(bundle, slots)| {
                if bundle.trim().is_empty() {
                    return Err(SlotTableError::EmptyBundle);
                }
                let slots = slots
                    .into_iter()
                    .map(|(ad_type, slot)| {
                        SlotId::try_new(slot)
                            .map(|slot| (ad_type, slot))
                            .map_err(|_| SlotTableError::EmptySlot {
                                bundle: bundle.clone(),
                                ad_type,
                            })
                    })
                    .collect::<Result<HashMap<_, _>, _>>()?;
                Ok((bundle, slots))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let fallback = fallback
            .into_iter()
            .map(|(ad_type, slot)| {
                SlotId::try_new(slot)
                    .map(|slot| (ad_type, slot))
                    .map_err(|_| SlotTableError::EmptyFallback(ad_type))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self { mappings, fallback })
    }

    /// Resolve the slot for a bundle and ad type.
    ///
    /// A bundle-specific entry wins; otherwise the fallback for the ad type is
    /// used. `None` means no slot is configured at all, which callers treat as
    /// "no slot" rather than an error.
    pub fn resolve(&self, bundle: Option<&str>, ad_type: AdType) -> Option<&SlotId> {
        bundle
            .and_then(|bundle| self.mappings.get(bundle))
            .and_then(|slots| slots.get(&ad_type))
            .or_else(|| self.fallback.get(&ad_type))
    }

    pub fn bundle_count(&self) -> usize {
        self.mappings.len()
    }
}
