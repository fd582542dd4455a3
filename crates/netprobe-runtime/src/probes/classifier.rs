use crate::command::CommandOutput;
use crate::error::{ExecError, Result};
use crate::probes::builder::seconds_arg;
use netprobe_core::{ProbeOutcome, ValidatedProbe, ValidationError};

/// Outcome for a request that failed validation and was never executed
pub fn rejected(error: &ValidationError) -> ProbeOutcome {
    ProbeOutcome::error(format!("Error: {}", error))
}

/// Map an execution result to the outcome reported to the caller
pub fn classify(probe: &ValidatedProbe, result: Result<CommandOutput>) -> ProbeOutcome {
    match result {
        Err(ExecError::NotFound { program }) => ProbeOutcome::error(format!(
            "Error: '{}' command not found on the server.",
            program
        )),
        Err(ExecError::Timeout { timeout, .. }) => match probe {
            ValidatedProbe::Reachability(_) => ProbeOutcome::error(format!(
                "Error: Command timed out after {}s. Host {} may be unresponsive.",
                seconds_arg(timeout),
                probe.destination()
            )),
            ValidatedProbe::Http(_) => ProbeOutcome::error(format!(
                "Error: Request timed out after {}s. The request to {} took too long.",
                seconds_arg(timeout),
                probe.destination()
            )),
        },
        Err(ExecError::Other { message }) => {
            ProbeOutcome::error(format!("An unexpected error occurred: {}", message))
        }
        Ok(output) if output.exit_code == 0 => match probe {
            // Reachability tools report the connection on stderr even on success
            ValidatedProbe::Reachability(_) => {
                ProbeOutcome::success(format!("{}{}", output.stdout, output.stderr))
            }
            ValidatedProbe::Http(_) => ProbeOutcome::success(output.stdout),
        },
        Ok(output) => ProbeOutcome::error(format!("{}{}", output.stderr, output.stdout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netprobe_core::{
        validate_request, HttpProbeRequest, ProbeRequest, Protocol, ReachabilityRequest,
    };
    use std::time::Duration;

    fn tcp_probe() -> ValidatedProbe {
        validate_request(&ProbeRequest::Reachability(ReachabilityRequest {
            host: "db.internal".to_string(),
            port: "5432".to_string(),
            protocol: Protocol::Tcp,
        }))
        .unwrap()
    }

    fn http_probe() -> ValidatedProbe {
        validate_request(&ProbeRequest::Http(HttpProbeRequest {
            url: "https://example.com/health".to_string(),
            flags: String::new(),
        }))
        .unwrap()
    }

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_reachability_success_includes_stderr() {
        let outcome = classify(
            &tcp_probe(),
            Ok(output("", "Connection to db.internal 5432 port [tcp/*] succeeded!\n", 0)),
        );
        assert!(!outcome.is_error);
        assert_eq!(
            outcome.text,
            "Connection to db.internal 5432 port [tcp/*] succeeded!\n"
        );
    }

    #[test]
    fn test_http_success_is_stdout_only() {
        let outcome = classify(&http_probe(), Ok(output("<html>ok</html>", "noise", 0)));
        assert_eq!(outcome, ProbeOutcome::success("<html>ok</html>"));
    }

    #[test]
    fn test_non_zero_exit_puts_stderr_first() {
        let outcome = classify(
            &http_probe(),
            Ok(output("partial body", "curl: (22) The requested URL returned error\n", 22)),
        );
        assert!(outcome.is_error);
        assert_eq!(
            outcome.text,
            "curl: (22) The requested URL returned error\npartial body"
        );

        let outcome = classify(
            &tcp_probe(),
            Ok(output("", "nc: connect to db.internal port 5432 (tcp) failed: Connection refused\n", 1)),
        );
        assert!(outcome.is_error);
        assert!(outcome.text.contains("Connection refused"));
    }

    #[test]
    fn test_not_found_names_tool() {
        let outcome = classify(&tcp_probe(), Err(ExecError::not_found("nc")));
        assert_eq!(
            outcome,
            ProbeOutcome::error("Error: 'nc' command not found on the server.")
        );
    }

    #[test]
    fn test_timeout_names_destination_and_budget() {
        let outcome = classify(
            &tcp_probe(),
            Err(ExecError::timeout("nc", Duration::from_secs(10))),
        );
        assert_eq!(
            outcome,
            ProbeOutcome::error(
                "Error: Command timed out after 10s. Host db.internal:5432 may be unresponsive."
            )
        );

        let outcome = classify(
            &http_probe(),
            Err(ExecError::timeout("curl", Duration::from_secs(5))),
        );
        assert!(outcome.is_error);
        assert!(outcome.text.contains("after 5s"));
        assert!(outcome.text.contains("https://example.com/health"));
    }

    #[test]
    fn test_other_embeds_cause() {
        let outcome = classify(&http_probe(), Err(ExecError::other("Too many open files")));
        assert_eq!(
            outcome,
            ProbeOutcome::error("An unexpected error occurred: Too many open files")
        );
    }

    #[test]
    fn test_rejected_prefixes_error() {
        let outcome = rejected(&ValidationError::invalid_url("ftp://x"));
        assert!(outcome.is_error);
        assert_eq!(
            outcome.text,
            "Error: Invalid or insecure URL provided: ftp://x. Must be a full URL or host:port."
        );
    }
}
