use crate::error::{ArmatureError, Result};
use crate::routing::binding::{BindingSet, BoundValue, ParamSource};
use axum::response::Response;
use axum::routing::MethodFilter;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use strum_macros::Display;

/// HTTP verbs a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub(crate) fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Patch => MethodFilter::PATCH,
        }
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// The type-erased handler a route dispatches to: positional bound values
/// in, response out.
pub type DynHandler = Arc<dyn Fn(Vec<Option<BoundValue>>) -> HandlerFuture + Send + Sync>;

/// Route metadata: verb, sub-path, handler name, and parameter bindings.
/// Immutable once handed to the registry.
#[derive(Debug, Clone)]
pub struct Route {
    method: HttpMethod,
    path: String,
    handler_name: &'static str,
    bindings: BindingSet,
}

impl Route {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        handler_name: &'static str,
        arity: usize,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            handler_name,
            bindings: BindingSet::with_arity(arity),
        }
    }

    /// Bind parameter `index` to `source`; rebinding keeps the last value.
    pub fn bind(mut self, index: usize, source: ParamSource) -> Self {
        self.bindings.bind(index, source);
        self
    }

    /// Strict variant of [`Route::bind`] that rejects an index claimed twice.
    pub fn try_bind(mut self, index: usize, source: ParamSource) -> Result<Self> {
        if self.bindings.get(index).is_some() {
            return Err(ArmatureError::ConflictingBinding {
                handler: self.handler_name.to_string(),
                index,
            });
        }
        self.bindings.bind(index, source);
        Ok(self)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }
}

/// A route plus the handler it dispatches to.
pub struct RouteDefinition {
    pub(crate) route: Route,
    pub(crate) handler: DynHandler,
}

impl RouteDefinition {
    pub fn new(route: Route, handler: DynHandler) -> Self {
        Self { route, handler }
    }
}

/// Join path segments into a single absolute route path, collapsing
/// duplicate slashes. An all-empty input maps to "/".
pub(crate) fn join_paths(segments: &[&str]) -> String {
    let mut out = String::new();
    for segment in segments {
        let trimmed = segment.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        out.push('/');
        out.push_str(trimmed);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_prefixes_and_roots() {
        assert_eq!(join_paths(&["api", "/users", "/"]), "/api/users");
        assert_eq!(join_paths(&["api", "/users", "/{id}"]), "/api/users/{id}");
        assert_eq!(join_paths(&["", "/health", "/"]), "/health");
        assert_eq!(join_paths(&["", "/", "/"]), "/");
    }

    #[test]
    fn try_bind_rejects_a_reclaimed_index() {
        let route = Route::new(HttpMethod::Get, "/", "list", 1)
            .try_bind(0, ParamSource::Query)
            .unwrap();
        let err = route.try_bind(0, ParamSource::Headers).unwrap_err();
        match err {
            ArmatureError::ConflictingBinding { handler, index } => {
                assert_eq!(handler, "list");
                assert_eq!(index, 0);
            }
            other => panic!("expected ConflictingBinding, got {other}"),
        }
    }

    #[test]
    fn bind_is_last_applied_wins() {
        let route = Route::new(HttpMethod::Get, "/", "list", 1)
            .bind(0, ParamSource::Query)
            .bind(0, ParamSource::Headers);
        assert_eq!(route.bindings().get(0), Some(ParamSource::Headers));
    }

    #[test]
    fn methods_display_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
