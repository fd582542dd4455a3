use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use url::Url;

/// Transport used by a reachability probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(format!("unknown protocol '{}', expected tcp or udp", other)),
        }
    }
}

/// Which of the two probe operations a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Reachability,
    Http,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::Reachability => write!(f, "reachability"),
            ProbeKind::Http => write!(f, "http"),
        }
    }
}

/// Raw TCP/UDP reachability request, exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityRequest {
    pub host: String,
    pub port: String,
    #[serde(default)]
    pub protocol: Protocol,
}

/// Raw HTTP probe request, exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpProbeRequest {
    pub url: String,
    /// Whitespace-delimited option tokens
    #[serde(default)]
    pub flags: String,
}

/// Untrusted probe request submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeRequest {
    Reachability(ReachabilityRequest),
    Http(HttpProbeRequest),
}

impl ProbeRequest {
    pub fn kind(&self) -> ProbeKind {
        match self {
            ProbeRequest::Reachability(_) => ProbeKind::Reachability,
            ProbeRequest::Http(_) => ProbeKind::Http,
        }
    }
}

/// A domain name that passed the FQDN grammar
///
/// Kept byte-for-byte as supplied, including a trailing dot, so an absolute
/// name stays absolute for the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fqdn(String);

impl Fqdn {
    pub(crate) fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated probe target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostSpec {
    IpLiteral(IpAddr),
    Fqdn(Fqdn),
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostSpec::IpLiteral(addr) => write!(f, "{}", addr),
            HostSpec::Fqdn(name) => write!(f, "{}", name.as_str()),
        }
    }
}

/// An http(s) URL with a non-empty authority
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbsoluteUrl(Url);

impl AbsoluteUrl {
    pub(crate) fn new_unchecked(url: Url) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn host_str(&self) -> Option<&str> {
        self.0.host_str()
    }

    pub fn port_or_known_default(&self) -> Option<u16> {
        self.0.port_or_known_default()
    }
}

impl fmt::Display for AbsoluteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options an operator may pass to the HTTP probe
///
/// Ordering of the variants is the order they are emitted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpFlag {
    Verbose,
    VerboseLong,
    Include,
    IncludeLong,
    Head,
    HeadLong,
}

impl HttpFlag {
    pub const ALL: [HttpFlag; 6] = [
        HttpFlag::Verbose,
        HttpFlag::VerboseLong,
        HttpFlag::Include,
        HttpFlag::IncludeLong,
        HttpFlag::Head,
        HttpFlag::HeadLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpFlag::Verbose => "-v",
            HttpFlag::VerboseLong => "--verbose",
            HttpFlag::Include => "-i",
            HttpFlag::IncludeLong => "--include",
            HttpFlag::Head => "-I",
            HttpFlag::HeadLong => "--head",
        }
    }

    /// Exact, case-sensitive lookup of a single token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.as_str() == token)
    }
}

impl fmt::Display for HttpFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reachability probe whose every field passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityProbe {
    host: HostSpec,
    port: u16,
    protocol: Protocol,
}

impl ReachabilityProbe {
    pub(crate) fn new(host: HostSpec, port: u16, protocol: Protocol) -> Self {
        Self {
            host,
            port,
            protocol,
        }
    }

    pub fn host(&self) -> &HostSpec {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }
}

/// HTTP probe whose URL and flags passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProbe {
    url: AbsoluteUrl,
    flags: BTreeSet<HttpFlag>,
}

impl HttpProbe {
    pub(crate) fn new(url: AbsoluteUrl, flags: BTreeSet<HttpFlag>) -> Self {
        Self { url, flags }
    }

    pub fn url(&self) -> &AbsoluteUrl {
        &self.url
    }

    pub fn flags(&self) -> &BTreeSet<HttpFlag> {
        &self.flags
    }
}

/// A probe that may be built and executed
///
/// Only `validation::validate_request` produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedProbe {
    Reachability(ReachabilityProbe),
    Http(HttpProbe),
}

impl ValidatedProbe {
    pub fn kind(&self) -> ProbeKind {
        match self {
            ValidatedProbe::Reachability(_) => ProbeKind::Reachability,
            ValidatedProbe::Http(_) => ProbeKind::Http,
        }
    }

    /// Human-readable destination used in log lines and timeout messages
    pub fn destination(&self) -> String {
        match self {
            ValidatedProbe::Reachability(probe) => match probe.host() {
                HostSpec::IpLiteral(IpAddr::V6(addr)) => format!("[{}]:{}", addr, probe.port()),
                host => format!("{}:{}", host, probe.port()),
            },
            ValidatedProbe::Http(probe) => probe.url().to_string(),
        }
    }
}

/// Final answer handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ProbeOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_json_tagged_by_kind() {
        let json = r#"{"kind":"reachability","host":"example.com","port":"443"}"#;
        let request: ProbeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            ProbeRequest::Reachability(ReachabilityRequest {
                host: "example.com".to_string(),
                port: "443".to_string(),
                protocol: Protocol::Tcp,
            })
        );
        assert_eq!(request.kind(), ProbeKind::Reachability);

        let json = r#"{"kind":"http","url":"https://example.com"}"#;
        let request: ProbeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            ProbeRequest::Http(HttpProbeRequest {
                url: "https://example.com".to_string(),
                flags: String::new(),
            })
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind":"exec","command":"id"}"#;
        assert!(serde_json::from_str::<ProbeRequest>(json).is_err());
    }

    #[test]
    fn test_protocol_parse_is_exact() {
        assert_eq!("udp".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("UDP".parse::<Protocol>().is_err());
        assert!("icmp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_http_flag_lookup_is_exact() {
        assert_eq!(HttpFlag::from_token("-I"), Some(HttpFlag::Head));
        assert_eq!(HttpFlag::from_token("-i"), Some(HttpFlag::Include));
        assert_eq!(HttpFlag::from_token("--HEAD"), None);
        assert_eq!(HttpFlag::from_token("--head=1"), None);
        assert_eq!(HttpFlag::from_token("-vI"), None);
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let json = serde_json::to_string(&ProbeOutcome::error("boom")).unwrap();
        assert_eq!(json, r#"{"text":"boom","isError":true}"#);
    }
}
