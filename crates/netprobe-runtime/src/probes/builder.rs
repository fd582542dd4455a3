use netprobe_core::{HttpProbe, ProbeConfig, ProbeKind, Protocol, ReachabilityProbe, ValidatedProbe};
use std::time::Duration;

/// Render a duration as whole or fractional seconds ("10", "0.5")
pub fn seconds_arg(duration: Duration) -> String {
    duration.as_secs_f64().to_string()
}

/// Wall-clock budget enforced on a probe of the given kind
pub fn timeout_for(kind: ProbeKind, config: &ProbeConfig) -> Duration {
    match kind {
        ProbeKind::Reachability => config.reachability_timeout,
        ProbeKind::Http => config.http_timeout,
    }
}

/// Build the argument vector for a validated probe
///
/// Every value is its own element; nothing is joined into a command string.
pub fn build_argv(probe: &ValidatedProbe, config: &ProbeConfig) -> Vec<String> {
    match probe {
        ValidatedProbe::Reachability(probe) => reachability_argv(probe, config),
        ValidatedProbe::Http(probe) => http_argv(probe, config),
    }
}

fn reachability_argv(probe: &ReachabilityProbe, config: &ProbeConfig) -> Vec<String> {
    let mut argv = vec![
        config.tcp_probe_program.clone(),
        "-v".to_string(),
        "-z".to_string(),
    ];
    if probe.protocol() == Protocol::Udp {
        argv.push("-u".to_string());
    }
    argv.push(probe.host().to_string());
    argv.push(probe.port().to_string());
    argv
}

fn http_argv(probe: &HttpProbe, config: &ProbeConfig) -> Vec<String> {
    let mut argv = vec![
        config.http_probe_program.clone(),
        "-sSL".to_string(),
        "-m".to_string(),
        seconds_arg(config.http_timeout),
    ];
    argv.extend(probe.flags().iter().map(|flag| flag.as_str().to_string()));
    // The URL goes last: some clients stop reading options at the first operand
    argv.push(probe.url().as_str().to_string());
    argv
}
