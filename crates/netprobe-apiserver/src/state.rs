use netprobe_core::EnvironmentInfo;
use netprobe_runtime::ProbeHandler;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Probe engine shared by every request
    pub handler: Arc<ProbeHandler>,

    /// Workload metadata captured at startup
    pub environment: Arc<EnvironmentInfo>,
}

impl AppState {
    pub fn new(handler: Arc<ProbeHandler>, environment: EnvironmentInfo) -> Self {
        Self {
            handler,
            environment: Arc::new(environment),
        }
    }
}
