//! Outbound request construction.
//!
//! # Responsibilities
//! - Rebuild the forwarded request from the inbound parts and buffered body
//! - Point it at the matched backend (plain `http`, path and query kept)
//! - Leave the destination untouched when nothing matched
//! - Pick the passthrough destination (absolute-form host or default upstream)
//!
//! # Design Decisions
//! - The body was buffered once for decoding; the same bytes are resent
//! - Method, headers, version and extensions are carried over as-is

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{Request, Uri};

/// Build the request to forward.
///
/// With a backend, only the URI scheme and authority change. Without one the
/// request is rebuilt exactly as received.
pub fn rewrite_request(parts: Parts, body: Bytes, backend: Option<&Authority>) -> Request<Body> {
    let mut parts = parts;
    if let Some(host) = backend {
        parts.uri = retarget_uri(&parts.uri, host);
    }
    Request::from_parts(parts, Body::from(body))
}

/// `http://{host}{path}?{query}` for the given URI.
pub fn retarget_uri(uri: &Uri, host: &Authority) -> Uri {
    let mut uri_parts = uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(host.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(uri_parts).unwrap_or_else(|_| uri.clone())
}

/// Destination for a request no backend claimed.
///
/// An absolute-form URI keeps its own host; an origin-form URI goes to
/// `default_upstream`. Either way the request is sent over plain `http`.
/// `None` when there is nowhere to send it.
pub fn passthrough_uri(uri: &Uri, default_upstream: Option<&Authority>) -> Option<Uri> {
    let host = uri.authority().or(default_upstream)?;
    Some(retarget_uri(uri, host))
}
