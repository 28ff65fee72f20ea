//! SSDP response parsing.
//!
//! An SSDP search response is an HTTP response head (status line plus
//! headers, no body) carried in a single UDP datagram. Parsing has three
//! outcomes:
//!
//! - [`ResponseOutcome::Accepted`] for a Roku ECP device,
//! - [`ResponseOutcome::Rejected`] for any other responder (the common case),
//! - [`ResponseError`] for a response that cannot be trusted at all.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use super::types::{DeviceDescriptor, RejectReason, ResponseError, ResponseOutcome};
use crate::protocol_constants::{ROKU_DEVICE_GROUP_HEADER, ROKU_SEARCH_TARGET, ROKU_USN_PREFIX};

/// Checks if `s` starts with `prefix` (ASCII case-insensitive, no allocation).
#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// A parsed HTTP response head.
#[derive(Debug)]
struct ResponseHead<'a> {
    status: u16,
    headers: Vec<(&'a str, &'a str)>,
}

impl<'a> ResponseHead<'a> {
    /// Returns the first value of `name` (ASCII case-insensitive).
    fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }
}

/// True if `name` is a non-empty HTTP token (RFC 9110 `tchar`s only).
fn is_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Splits a datagram into status code and headers.
fn parse_head(text: &str) -> Result<ResponseHead<'_>, ResponseError> {
    let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let status_line = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| ResponseError::Malformed("empty datagram".into()))?;

    if !starts_with_ignore_ascii_case(status_line, "HTTP/") {
        return Err(ResponseError::Malformed(format!(
            "not an HTTP response: '{}'",
            status_line
        )));
    }

    let code = status_line.split_whitespace().nth(1).unwrap_or("");
    let status = match code.parse::<u16>() {
        Ok(s) if code.len() == 3 => s,
        _ => {
            return Err(ResponseError::Malformed(format!(
                "invalid status code '{}'",
                code
            )))
        }
    };

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ResponseError::Malformed(format!("malformed header line '{}'", line)))?;
        if !is_field_name(name) {
            return Err(ResponseError::Malformed(format!(
                "malformed header line '{}'",
                line
            )));
        }
        headers.push((name, value.trim()));
    }

    Ok(ResponseHead { status, headers })
}

/// Parses a `Cache-Control` value of the form `max-age=<seconds>`.
///
/// Anything else, including other directives or extra whitespace, is an error.
pub fn parse_cache_control(value: &str) -> Result<Duration, ResponseError> {
    let invalid = || ResponseError::InvalidCacheControl(value.to_string());

    let secs = value.strip_prefix("max-age=").ok_or_else(invalid)?;
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    secs.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid())
}

/// Parses one discovery datagram.
///
/// # Arguments
/// * `datagram` - Raw UDP payload
/// * `source` - Sender address, recorded on the descriptor
pub fn parse_ssdp_response(
    datagram: &[u8],
    source: SocketAddr,
) -> Result<ResponseOutcome, ResponseError> {
    let text = std::str::from_utf8(datagram)
        .map_err(|e| ResponseError::Malformed(format!("invalid UTF-8: {}", e)))?;
    let head = parse_head(text)?;

    if head.status != 200 {
        return Ok(ResponseOutcome::Rejected(RejectReason::Status(head.status)));
    }
    match head.header("ST") {
        Some(ROKU_SEARCH_TARGET) => {}
        other => {
            return Ok(ResponseOutcome::Rejected(RejectReason::SearchTarget(
                other.map(str::to_string),
            )))
        }
    }

    let location = head.header("location").unwrap_or("");
    let base_endpoint = Url::parse(location).map_err(|e| ResponseError::InvalidLocation {
        value: location.to_string(),
        reason: e.to_string(),
    })?;

    let advertised_lifetime = parse_cache_control(head.header("Cache-Control").unwrap_or(""))?;

    let usn = head.header("USN").unwrap_or("");
    let unique_id = usn.strip_prefix(ROKU_USN_PREFIX).unwrap_or(usn).to_string();

    let group_tag = head
        .header(ROKU_DEVICE_GROUP_HEADER)
        .filter(|g| !g.is_empty())
        .map(str::to_string);

    Ok(ResponseOutcome::Accepted(DeviceDescriptor {
        base_endpoint,
        unique_id,
        group_tag,
        advertised_lifetime,
        source,
    }))
}
