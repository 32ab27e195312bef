//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Chain the caller's IP into X-Forwarded-For
//! - Strip hop-by-hop headers (RFC 2616 §13.5.1) in both directions
//!
//! # Design Decisions
//! - Existing X-Forwarded-For values are kept; the caller IP goes on the left
//! - Headers named by `Connection` are removed along with the fixed set

use std::net::{IpAddr, SocketAddr};

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, CONNECTION};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Headers that only apply to a single transport leg.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// The caller's IP with the port dropped. IPv4-mapped IPv6 addresses are
/// reported as plain IPv4.
pub fn client_ip(remote_addr: SocketAddr) -> IpAddr {
    remote_addr.ip().to_canonical()
}

/// Value for the outbound X-Forwarded-For header.
///
/// `"<ip>"` when the inbound request has none, otherwise
/// `"<ip>, <existing>"`. Repeated inbound headers are joined in order.
pub fn forwarded_for(ip: IpAddr, headers: &HeaderMap) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = ip.to_string().into_bytes();
    for existing in headers.get_all(&X_FORWARDED_FOR) {
        let existing = existing.as_bytes().trim_ascii();
        if existing.is_empty() {
            continue;
        }
        value.extend_from_slice(b", ");
        value.extend_from_slice(existing);
    }
    HeaderValue::from_bytes(&value)
}

/// Replace X-Forwarded-For with the chained value for `ip`.
pub fn set_forwarded_for(headers: &mut HeaderMap, ip: IpAddr) -> Result<(), InvalidHeaderValue> {
    let value = forwarded_for(ip, headers)?;
    headers.insert(X_FORWARDED_FOR, value);
    Ok(())
}

/// Remove hop-by-hop headers in place.
///
/// Every token listed in `Connection` (comma separated, trimmed, compared
/// case-insensitively) is removed first, then the fixed RFC 2616 set.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<String> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    for name in &listed {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
}
