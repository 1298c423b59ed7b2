//! Application wiring
//!
//! Turns layered settings into the immutable auction configuration and runs
//! the HTTP server until shutdown.

pub mod app;

pub use app::Application;
