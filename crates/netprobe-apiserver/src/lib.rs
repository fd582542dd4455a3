//! Netprobe API Server - JSON endpoint for the probe engine
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Probe submission endpoint
//! - Environment metadata endpoint
//! - Health checks

pub mod error;
pub mod handlers;
pub mod response;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use error::{ApiError, Result};
pub use server::{ApiServer, Config};
pub use state::AppState;
