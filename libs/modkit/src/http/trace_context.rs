//! W3C Trace Context helpers
//!
//! Manual header manipulation keeps the client independent of the
//! OpenTelemetry crates; a fresh trace id is minted per outgoing request.

use http::{HeaderMap, HeaderName, HeaderValue};

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

/// Build a `traceparent` value: `00-<trace-id>-<span-id>-01`.
pub fn new_traceparent() -> String {
    let trace_id = rand::random::<u128>().max(1);
    let span_id = rand::random::<u64>().max(1);
    format!("00-{trace_id:032x}-{span_id:016x}-01")
}

/// Insert a `traceparent` header unless the caller already set one.
/// Returns the trace id in effect.
pub fn inject_trace_context(headers: &mut HeaderMap) -> Option<String> {
    if let Some(existing) = extract_trace_parent(headers) {
        return parse_trace_id(&existing);
    }

    let traceparent = new_traceparent();
    let trace_id = parse_trace_id(&traceparent);
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(HeaderName::from_static(TRACEPARENT), value);
    }
    trace_id
}

/// Raw `traceparent` header, if present and valid ASCII.
pub fn extract_trace_parent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(TRACEPARENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Trace id component of a version-00 `traceparent`.
pub fn parse_trace_id(traceparent: &str) -> Option<String> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) if trace_id.len() == 32 => {
            Some(trace_id.to_string())
        }
        _ => None,
    }
}
