use miette::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a completed run of an external probe tool
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ExecError {
    /// The probe tool is not installed
    #[error("'{program}' command not found")]
    #[diagnostic(
        code(netprobe::runtime::not_found),
        help("Install '{program}' in the image or point the configuration at its absolute path")
    )]
    NotFound {
        #[allow(unused)]
        program: String,
    },

    /// The probe tool exceeded its wall-clock budget and was killed
    #[error("'{program}' timed out after {}s", .timeout.as_secs_f64())]
    #[diagnostic(
        code(netprobe::runtime::timeout),
        help("The destination may be unresponsive or filtered. The process group was terminated")
    )]
    Timeout {
        #[allow(unused)]
        program: String,
        #[allow(unused)]
        timeout: Duration,
    },

    /// Spawning the tool or collecting its output failed
    #[error("{message}")]
    #[diagnostic(
        code(netprobe::runtime::other),
        help("This usually means the host is out of processes or file descriptors")
    )]
    Other {
        #[allow(unused)]
        message: String,
    },
}

/// Result type alias for process execution
pub type Result<T> = std::result::Result<T, ExecError>;

impl ExecError {
    pub fn not_found(program: impl Into<String>) -> Self {
        Self::NotFound {
            program: program.into(),
        }
    }

    pub fn timeout(program: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            program: program.into(),
            timeout,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
