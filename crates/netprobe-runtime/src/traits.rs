use crate::command::CommandOutput;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for running a probe tool from an argument vector
///
/// Implementations must never hand the vector to a shell, and must not return
/// until the child has exited or been killed and reaped. `ProcessExecutor`
/// spawns real processes; `MockExecutor` replays scripted results in tests.
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// Run `argv[0]` with `argv[1..]` as its arguments under a hard timeout
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput>;
}
