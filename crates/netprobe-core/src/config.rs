use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder reported for environment metadata that was not provided
pub const UNKNOWN: &str = "N/A";

/// Process-wide probe settings, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Program used for TCP/UDP reachability probes
    pub tcp_probe_program: String,
    /// Program used for HTTP probes
    pub http_probe_program: String,
    /// Hard wall-clock budget for a reachability probe
    pub reachability_timeout: Duration,
    /// Hard wall-clock budget for an HTTP probe, also handed to the client as its max time
    pub http_timeout: Duration,
    /// How long a timed-out child may take to exit after SIGTERM before it is killed
    pub kill_grace_period: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            tcp_probe_program: "nc".to_string(),
            http_probe_program: "curl".to_string(),
            reachability_timeout: Duration::from_secs(10),
            http_timeout: Duration::from_secs(5),
            kill_grace_period: Duration::from_millis(500),
        }
    }
}

/// Read-only metadata about the workload this process runs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub pod_name: String,
    pub pod_namespace: String,
    pub service_name: String,
    pub app_label: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            pod_name: UNKNOWN.to_string(),
            pod_namespace: UNKNOWN.to_string(),
            service_name: UNKNOWN.to_string(),
            app_label: UNKNOWN.to_string(),
        }
    }
}

impl EnvironmentInfo {
    /// Build from a key lookup, falling back to `N/A` for missing or empty values
    ///
    /// Keys are `POD_NAME`, `POD_NAMESPACE`, `SERVICE_NAME` and `APP_LABEL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Self {
            pod_name: get("POD_NAME"),
            pod_namespace: get("POD_NAMESPACE"),
            service_name: get("SERVICE_NAME"),
            app_label: get("APP_LABEL"),
        }
    }
}
