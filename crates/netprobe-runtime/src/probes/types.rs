use chrono::{DateTime, Utc};
use netprobe_core::{ProbeKind, ProbeOutcome};
use std::time::Duration;
use uuid::Uuid;

/// Outcome of a single probe request with timing metadata
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub request_id: Uuid,
    pub kind: ProbeKind,
    pub outcome: ProbeOutcome,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn is_error(&self) -> bool {
        self.outcome.is_error
    }
}
