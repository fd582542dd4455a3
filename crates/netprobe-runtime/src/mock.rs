use crate::command::CommandOutput;
use crate::error::Result;
use crate::traits::ProbeExecutor;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// One invocation seen by `MockExecutor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub argv: Vec<String>,
    pub timeout: Duration,
}

/// Scripted executor for tests
///
/// Returns queued results in order, then the default result (a successful,
/// silent exit) once the queue is empty. Every call is recorded.
#[derive(Clone)]
pub struct MockExecutor {
    queued: Arc<RwLock<VecDeque<Result<CommandOutput>>>>,
    default_result: Arc<RwLock<Result<CommandOutput>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            queued: Arc::new(RwLock::new(VecDeque::new())),
            default_result: Arc::new(RwLock::new(Ok(CommandOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            }))),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a result for the next unanswered call
    pub async fn push_result(&self, result: Result<CommandOutput>) {
        self.queued.write().await.push_back(result);
    }

    /// Replace the result returned once the queue is drained
    pub async fn set_default_result(&self, result: Result<CommandOutput>) {
        *self.default_result.write().await = result;
    }

    /// All calls made so far, oldest first
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbeExecutor for MockExecutor {
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput> {
        debug!("Mock: run {:?} (timeout {:?})", argv, timeout);

        self.calls.write().await.push(RecordedCall {
            argv: argv.to_vec(),
            timeout,
        });

        if let Some(result) = self.queued.write().await.pop_front() {
            return result;
        }

        self.default_result.read().await.clone()
    }
}
