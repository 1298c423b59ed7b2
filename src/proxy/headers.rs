//! HTTP header and path constants for the proxy service

/// Standard header re-exports for convenience
pub use ::http::header::CONTENT_TYPE;

/// Well-known paths
pub mod paths {
    /// OpenRTB auction endpoint
    pub const AUCTION: &str = "/openrtb2/auction";

    /// Health check endpoint path
    pub const HEALTH: &str = "/health";
}

/// Common content types
pub mod content_types {
    pub const APPLICATION_JSON: &str = "application/json";
}
