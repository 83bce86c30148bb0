use crate::common::{ApiResponse, StatusCode};
use crate::error::{ArmatureError, Result};
use crate::routing::binding::{BindingSet, ParamSource};
use crate::routing::context::{RequestContext, RequestInfo, ResponseHead};
use crate::routing::metadata::{DynHandler, HttpMethod, RouteDefinition, join_paths};
use axum::Router;
use axum::extract::{Path, Query, Request};
use axum::response::{IntoResponse, Response};
use axum::routing::on;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Bodies are only read when a route binds them; cap what we buffer.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Collects every controller's route definitions at startup, rejects
/// conflicting claims, and compiles the result into an `axum::Router`.
///
/// Each mounted handler re-reads its route's binding set on every request:
/// it builds a [`RequestContext`] from the live request, extracts the bound
/// positions, invokes the controller method with them, and merges any
/// [`ResponseHead`] mutations into the response.
pub struct RouteRegistry {
    prefix: String,
    claimed: HashSet<(HttpMethod, String)>,
    mounted: Vec<MountedRoute>,
}

struct MountedRoute {
    method: HttpMethod,
    full_path: String,
    compiled: Arc<CompiledRoute>,
}

struct CompiledRoute {
    handler_name: &'static str,
    bindings: BindingSet,
    handler: DynHandler,
}

impl RouteRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            claimed: HashSet::new(),
            mounted: Vec::new(),
        }
    }

    /// Mount every route of one controller under `prefix + base_path`.
    /// Fails with [`ArmatureError::DuplicateRoute`] when a (verb, path) pair
    /// is already claimed, aborting startup.
    pub fn register_controller(
        &mut self,
        base_path: &str,
        definitions: Vec<RouteDefinition>,
    ) -> Result<()> {
        for definition in definitions {
            let RouteDefinition { route, handler } = definition;
            let full_path = join_paths(&[&self.prefix, base_path, route.path()]);
            if !self.claimed.insert((route.method(), full_path.clone())) {
                return Err(ArmatureError::DuplicateRoute {
                    method: route.method().to_string(),
                    path: full_path,
                });
            }

            tracing::debug!(
                method = %route.method(),
                path = %full_path,
                handler = route.handler_name(),
                "mounting route"
            );
            self.mounted.push(MountedRoute {
                method: route.method(),
                full_path,
                compiled: Arc::new(CompiledRoute {
                    handler_name: route.handler_name(),
                    bindings: route.bindings().clone(),
                    handler,
                }),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn into_router<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let mut router = Router::new();
        for mounted in self.mounted {
            let compiled = mounted.compiled;
            let handler = move |params: Option<Path<HashMap<String, String>>>,
                                Query(query): Query<HashMap<String, String>>,
                                request: Request| {
                let compiled = Arc::clone(&compiled);
                async move {
                    let params = params.map(|Path(p)| p).unwrap_or_default();
                    compiled.invoke(params, query, request).await
                }
            };
            router = router.route(&mounted.full_path, on(mounted.method.filter(), handler));
        }
        router
    }
}

impl CompiledRoute {
    async fn invoke(
        &self,
        params: HashMap<String, String>,
        query: HashMap<String, String>,
        request: Request,
    ) -> Response {
        let (parts, body) = request.into_parts();
        let request_info = RequestInfo::from_parts(&parts);

        let body_value = if self.bindings.wants(ParamSource::Body) {
            let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    return ApiResponse::<()>::error(
                        StatusCode::BadRequest,
                        format!("failed to read request body: {err}"),
                    )
                    .into_response();
                }
            };
            if bytes.is_empty() {
                Value::Null
            } else {
                match serde_json::from_slice(&bytes) {
                    Ok(value) => value,
                    Err(err) => {
                        return ApiResponse::<()>::error(
                            StatusCode::BadRequest,
                            format!("invalid JSON body: {err}"),
                        )
                        .into_response();
                    }
                }
            }
        } else {
            Value::Null
        };

        let response_head = ResponseHead::new();
        let context = RequestContext {
            request: request_info,
            headers: parts.headers,
            body: body_value,
            params,
            query,
            response: response_head.clone(),
        };

        tracing::trace!(handler = self.handler_name, "dispatching request");
        let args = self.bindings.extract(&context);
        let response = (self.handler)(args).await;
        response_head.apply(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::metadata::{HandlerFuture, Route};
    use axum::http::StatusCode as HttpStatusCode;

    fn noop_handler() -> DynHandler {
        Arc::new(|_args| {
            let fut: HandlerFuture = Box::pin(async { HttpStatusCode::OK.into_response() });
            fut
        })
    }

    fn definition(method: HttpMethod, path: &str) -> RouteDefinition {
        RouteDefinition::new(Route::new(method, path, "handler", 0), noop_handler())
    }

    #[test]
    fn same_verb_and_path_is_rejected() {
        let mut registry = RouteRegistry::new("api");
        registry
            .register_controller("/users", vec![definition(HttpMethod::Get, "/")])
            .unwrap();
        let err = registry
            .register_controller("/users", vec![definition(HttpMethod::Get, "/")])
            .unwrap_err();
        match err {
            ArmatureError::DuplicateRoute { method, path } => {
                assert_eq!(method, "GET");
                assert_eq!(path, "/api/users");
            }
            other => panic!("expected DuplicateRoute, got {other}"),
        }
    }

    #[test]
    fn same_path_with_different_verbs_is_fine() {
        let mut registry = RouteRegistry::new("api");
        registry
            .register_controller(
                "/users",
                vec![
                    definition(HttpMethod::Get, "/"),
                    definition(HttpMethod::Post, "/"),
                ],
            )
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn prefix_and_base_path_shape_the_mounted_path() {
        let mut registry = RouteRegistry::new("");
        registry
            .register_controller("/health", vec![definition(HttpMethod::Get, "/")])
            .unwrap();
        assert!(registry.claimed.contains(&(HttpMethod::Get, "/health".to_string())));
    }
}
