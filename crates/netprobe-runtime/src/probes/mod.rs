pub mod builder;
pub mod classifier;
pub mod handler;
pub mod types;

pub use builder::{build_argv, timeout_for};
pub use classifier::{classify, rejected};
pub use handler::ProbeHandler;
pub use types::ProbeResult;
