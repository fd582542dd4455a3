// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Rejection of untrusted probe input
///
/// The display text is surfaced verbatim to the operator, so it names the
/// offending value exactly as it was received.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ValidationError {
    /// Host is neither an IP literal nor a fully-qualified domain name
    #[error("Invalid IP address or FQDN provided: {host}")]
    #[diagnostic(
        code(netprobe::invalid_host),
        help("Use an IPv4/IPv6 literal or a domain name made of labels of 1-63 letters, digits or '-' that do not start or end with '-'")
    )]
    InvalidHost {
        #[allow(unused)]
        host: String,
    },

    /// Port is not a base-10 integer in 1..=65535
    #[error("Invalid port number: {port}. Must be 1-65535.")]
    #[diagnostic(
        code(netprobe::invalid_port),
        help("Ports are plain decimal numbers between 1 and 65535")
    )]
    InvalidPort {
        #[allow(unused)]
        port: String,
    },

    /// URL is not an absolute http(s) URL with an authority
    #[error("Invalid or insecure URL provided: {url}. Must be a full URL or host:port.")]
    #[diagnostic(
        code(netprobe::invalid_url),
        help("Only http:// and https:// URLs are accepted. A bare host or host:port is treated as http://")
    )]
    InvalidUrl {
        #[allow(unused)]
        url: String,
    },

    /// A flag token is not on the allow-list
    #[error("Disallowed or invalid curl flag used: '{flag}'.")]
    #[diagnostic(
        code(netprobe::disallowed_flag),
        help("Allowed flags: -v, --verbose, -i, --include, -I, --head")
    )]
    DisallowedFlag {
        #[allow(unused)]
        flag: String,
    },
}

/// Result type alias for validation
pub type Result<T> = std::result::Result<T, ValidationError>;

impl ValidationError {
    pub fn invalid_host(host: impl Into<String>) -> Self {
        Self::InvalidHost { host: host.into() }
    }

    pub fn invalid_port(port: impl Into<String>) -> Self {
        Self::InvalidPort { port: port.into() }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn disallowed_flag(flag: impl Into<String>) -> Self {
        Self::DisallowedFlag { flag: flag.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_input() {
        let err = ValidationError::invalid_host("bad_host");
        assert_eq!(
            err.to_string(),
            "Invalid IP address or FQDN provided: bad_host"
        );

        let err = ValidationError::invalid_port("0");
        assert_eq!(err.to_string(), "Invalid port number: 0. Must be 1-65535.");

        let err = ValidationError::disallowed_flag("-o");
        assert_eq!(err.to_string(), "Disallowed or invalid curl flag used: '-o'.");
    }
}
