//! Ad format classification for impressions

use crate::domain::openrtb::Impression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared format of an impression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Video,
    Banner,
    Native,
    Unknown,
}

impl AdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Banner => "banner",
            Self::Native => "native",
            Self::Unknown => "unknown",
        }
    }

    /// Classify an impression by which format key is present.
    ///
    /// Presence is what counts, not the value; `video` wins over `banner`,
    /// which wins over `native`.
    pub fn classify(imp: &Impression) -> Self {
        if imp.video.is_some() {
            Self::Video
        } else if imp.banner.is_some() {
            Self::Banner
        } else if imp.native.is_some() {
            Self::Native
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for AdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
