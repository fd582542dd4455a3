// Allow unused assignments for diagnostic fields - they're used by the thiserror/miette macros
#![allow(unused_assignments)]

pub mod command;
pub mod error;
pub mod mock;
pub mod probes;
pub mod traits;

// Re-export primary types
pub use command::{CommandOutput, ProcessExecutor};
pub use error::{ExecError, Result};
pub use mock::{MockExecutor, RecordedCall};
pub use probes::{ProbeHandler, ProbeResult};
pub use traits::ProbeExecutor;
