use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, Version};
use axum::response::Response;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A snapshot of the request line and headers, injectable as the "request
/// object" of a handler.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub(crate) fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            version: parts.version,
            headers: parts.headers.clone(),
        }
    }
}

/// An injectable handle onto the outgoing response head.
///
/// A handler that binds a `ResponseHead` can set a status code or headers
/// during its run; the overrides are merged into whatever response the
/// handler returns. Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct ResponseHead {
    inner: Arc<Mutex<HeadParts>>,
}

#[derive(Default)]
struct HeadParts {
    status: Option<StatusCode>,
    headers: HeaderMap,
}

impl ResponseHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the response status. Takes precedence over the status of the
    /// value the handler returns.
    pub fn set_status(&self, status: StatusCode) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status = Some(status);
    }

    /// Set a header on the outgoing response, replacing any header of the
    /// same name the handler's return value carried.
    pub fn insert_header(&self, name: HeaderName, value: HeaderValue) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .headers
            .insert(name, value);
    }

    pub(crate) fn apply(&self, mut response: Response) -> Response {
        let parts = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(status) = parts.status {
            *response.status_mut() = status;
        }
        for (name, value) in parts.headers.iter() {
            response.headers_mut().insert(name.clone(), value.clone());
        }
        response
    }
}

/// Everything a binding set can draw from for one request. Built once per
/// request by the route registry, immediately before extraction.
pub struct RequestContext {
    pub(crate) request: RequestInfo,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Value,
    pub(crate) params: HashMap<String, String>,
    pub(crate) query: HashMap<String, String>,
    pub(crate) response: ResponseHead,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn apply_overrides_status_and_merges_headers() {
        let head = ResponseHead::new();
        head.set_status(StatusCode::ACCEPTED);
        head.insert_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc"),
        );

        let response = head.apply("done".into_response());
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc");
    }

    #[test]
    fn apply_without_mutations_is_a_passthrough() {
        let head = ResponseHead::new();
        let response = head.apply("done".into_response());
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn clones_share_state() {
        let head = ResponseHead::new();
        let clone = head.clone();
        clone.set_status(StatusCode::CREATED);

        let response = head.apply("done".into_response());
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
