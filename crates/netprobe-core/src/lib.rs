//! Netprobe Core - Types and validators for the network probe engine
//!
//! This crate provides:
//! - Raw, untrusted probe requests and their validated counterparts
//! - Strict grammars for hosts, ports, URLs and HTTP probe flags
//! - Error types with miette diagnostics
//! - Startup configuration shared read-only by every request

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{EnvironmentInfo, ProbeConfig};
pub use error::{Result, ValidationError};
pub use types::{
    AbsoluteUrl, Fqdn, HostSpec, HttpFlag, HttpProbe, HttpProbeRequest, ProbeKind, ProbeOutcome,
    ProbeRequest, Protocol, ReachabilityProbe, ReachabilityRequest, ValidatedProbe,
};
pub use validation::{
    validate_flags, validate_host, validate_port, validate_request, validate_url,
};
