//! Request handling and transformation.
//!
//! # Responsibilities
//! - Extract routing-relevant information (host, path)
//! - Prepare request for forwarding to backend
//!
//! # Design Decisions
//! - Routing host comes from the URI authority, else the Host header, port removed
//! - Routing path is percent-decoded; the backend still gets the raw path
//! - Inbound headers copied, then X-Forwarded-For chained, then hop-by-hop stripped
//! - Host is left for the client to derive from the backend URI
//! - Method, headers and the body stream are otherwise passed through untouched

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header::HOST, Request, Uri};
use percent_encoding::percent_decode_str;

use crate::error::ProxyError;
use crate::routing::Service;
use crate::security::headers::{client_ip, set_forwarded_for, strip_hop_by_hop};

/// Host used for dispatching, without any port.
///
/// Empty when the request names no host at all.
pub fn routing_host<B>(request: &Request<B>) -> &str {
    if let Some(host) = request.uri().host() {
        return host;
    }
    request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port)
        .unwrap_or("")
}

/// Percent-decoded request path used for dispatching and the 404 body.
///
/// Invalid UTF-8 after decoding is replaced, not rejected.
pub fn routing_path<B>(request: &Request<B>) -> Cow<'_, str> {
    percent_decode_str(request.uri().path()).decode_utf8_lossy()
}

/// Drop a trailing `:port` from an authority, keeping IPv6 brackets.
pub fn strip_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    }
}

/// Build the outbound request for `service` from an inbound request.
pub fn build_proxy_request(
    service: &Service,
    remote_addr: SocketAddr,
    request: Request<Body>,
) -> Result<Request<Body>, ProxyError> {
    let (parts, body) = request.into_parts();

    let url = service.resolve(&parts.uri)?;
    let uri: Uri = url.as_str().parse().map_err(|source| ProxyError::InvalidUri {
        uri: url.to_string(),
        source,
    })?;

    let mut headers = parts.headers;
    headers.remove(HOST);
    set_forwarded_for(&mut headers, client_ip(remote_addr))?;
    strip_hop_by_hop(&mut headers);

    let mut builder = Request::builder().method(parts.method).uri(uri);
    if let Some(outbound) = builder.headers_mut() {
        *outbound = headers;
    }
    Ok(builder.body(body)?)
}
