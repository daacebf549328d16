//! Request correlation IDs.
//!
//! Every request carries an ID in `x-request-id`: the caller's value when it
//! looks sane, a fresh UUID v4 otherwise. The ID is tagged on the Sentry
//! scope, stored in the request extensions as [`RequestId`] and echoed on the
//! response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is reused.
const MAX_INCOMING_LENGTH: usize = 64;

/// The ID assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Reuse the caller's ID when it is short, non-empty visible ASCII.
fn incoming_id(value: Option<&HeaderValue>) -> Option<String> {
    let raw = value?.to_str().ok()?.trim();
    let usable = !raw.is_empty()
        && raw.len() <= MAX_INCOMING_LENGTH
        && raw.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| raw.to_string())
}

/// Assign a request ID and echo it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = incoming_id(request.headers().get(REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_id_is_reused_only_when_sane() {
        let ok = HeaderValue::from_static("edge-7f3a");
        assert_eq!(incoming_id(Some(&ok)).as_deref(), Some("edge-7f3a"));

        let blank = HeaderValue::from_static("   ");
        assert_eq!(incoming_id(Some(&blank)), None);

        let spaced = HeaderValue::from_static("two words");
        assert_eq!(incoming_id(Some(&spaced)), None);

        let long = HeaderValue::from_str(&"a".repeat(65)).unwrap_or(ok);
        assert_eq!(incoming_id(Some(&long)), None);

        assert_eq!(incoming_id(None), None);
    }
}
