use crate::probes::builder::{build_argv, timeout_for};
use crate::probes::classifier::{classify, rejected};
use crate::probes::types::ProbeResult;
use crate::traits::ProbeExecutor;
use chrono::Utc;
use netprobe_core::{validate_request, ProbeConfig, ProbeOutcome, ProbeRequest, ValidatedProbe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Validates, builds, runs and classifies probe requests
///
/// Holds no per-request state, so one handler serves any number of
/// concurrent requests.
pub struct ProbeHandler {
    executor: Arc<dyn ProbeExecutor>,
    config: Arc<ProbeConfig>,
}

impl ProbeHandler {
    pub fn new(executor: Arc<dyn ProbeExecutor>, config: Arc<ProbeConfig>) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Handle one untrusted request end to end
    pub async fn handle(&self, request: &ProbeRequest) -> ProbeResult {
        let request_id = Uuid::new_v4();
        let kind = request.kind();
        let start = Instant::now();

        let span = info_span!("probe", %request_id, %kind);
        let outcome = async {
            match validate_request(request) {
                Ok(probe) => self.execute(&probe).await,
                Err(e) => {
                    debug!("Rejected {} request: {}", kind, e);
                    rejected(&e)
                }
            }
        }
        .instrument(span)
        .await;

        ProbeResult {
            request_id,
            kind,
            outcome,
            duration: start.elapsed(),
            completed_at: Utc::now(),
        }
    }

    /// Run a probe that already passed validation
    pub async fn execute(&self, probe: &ValidatedProbe) -> ProbeOutcome {
        let argv = build_argv(probe, &self.config);
        let timeout = timeout_for(probe.kind(), &self.config);

        info!("Probing {} ({})", probe.destination(), probe.kind());
        let result = self.executor.run(&argv, timeout).await;
        let outcome = classify(probe, result);

        info!(
            "Probe of {} finished (error: {})",
            probe.destination(),
            outcome.is_error
        );
        outcome
    }
}
