//! Grammar checks for untrusted probe input
//!
//! Every function here is a pure function of its argument. Nothing is
//! resolved, dereferenced or decoded: a value either matches the grammar as
//! written or it is rejected.

use crate::types::{
    AbsoluteUrl, Fqdn, HostSpec, HttpFlag, HttpProbe, HttpProbeRequest, ProbeRequest,
    ReachabilityProbe, ReachabilityRequest, ValidatedProbe,
};
use crate::{Result, ValidationError};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::net::IpAddr;
use url::Url;

/// Longest host name accepted, trailing dot included
pub const MAX_FQDN_LEN: usize = 255;

/// Longest single DNS label
pub const MAX_LABEL_LEN: usize = 63;

/// Validate a probe target as an IP literal or a fully-qualified domain name
pub fn validate_host(host: &str) -> Result<HostSpec> {
    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(HostSpec::IpLiteral(addr));
    }

    if is_valid_fqdn(host) {
        return Ok(HostSpec::Fqdn(Fqdn::new_unchecked(host)));
    }

    Err(ValidationError::invalid_host(host))
}

/// Check a name against the FQDN grammar
///
/// At most one trailing dot is stripped; every remaining label must be
/// 1-63 ASCII letters, digits or '-', not starting or ending with '-'.
pub fn is_valid_fqdn(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FQDN_LEN {
        return false;
    }

    let name = name.strip_suffix('.').unwrap_or(name);
    name.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Validate a port as a base-10 integer in 1..=65535
pub fn validate_port(raw: &str) -> Result<u16> {
    match raw.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ValidationError::invalid_port(raw)),
    }
}

/// Validate and normalize an http(s) URL
///
/// Input without a `://` separator is treated as `http://<input>`, so bare
/// `host` and `host:port` forms are accepted.
pub fn validate_url(raw: &str) -> Result<AbsoluteUrl> {
    if raw.is_empty() {
        return Err(ValidationError::invalid_url(raw));
    }

    let candidate = if raw.contains("://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("http://{}", raw))
    };

    let parsed = Url::parse(&candidate).map_err(|_| ValidationError::invalid_url(raw))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::invalid_url(raw));
    }

    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(ValidationError::invalid_url(raw));
    }

    Ok(AbsoluteUrl::new_unchecked(parsed))
}

/// Validate a whitespace-delimited list of HTTP probe options
///
/// Rejects on the first token that is not exactly one of the allowed flags.
/// Repeated flags collapse into one.
pub fn validate_flags(raw: &str) -> Result<BTreeSet<HttpFlag>> {
    raw.split_whitespace()
        .map(|token| {
            HttpFlag::from_token(token).ok_or_else(|| ValidationError::disallowed_flag(token))
        })
        .collect()
}

/// Validate a reachability request field by field
pub fn validate_reachability(request: &ReachabilityRequest) -> Result<ReachabilityProbe> {
    let host = validate_host(&request.host)?;
    let port = validate_port(&request.port)?;
    Ok(ReachabilityProbe::new(host, port, request.protocol))
}

/// Validate an HTTP probe request field by field
pub fn validate_http(request: &HttpProbeRequest) -> Result<HttpProbe> {
    let url = validate_url(&request.url)?;
    let flags = validate_flags(&request.flags)?;
    Ok(HttpProbe::new(url, flags))
}

/// Run the validators for the request's kind
pub fn validate_request(request: &ProbeRequest) -> Result<ValidatedProbe> {
    match request {
        ProbeRequest::Reachability(req) => validate_reachability(req).map(ValidatedProbe::Reachability),
        ProbeRequest::Http(req) => validate_http(req).map(ValidatedProbe::Http),
    }
}
