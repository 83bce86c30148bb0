use crate::routing::context::{RequestContext, RequestInfo, ResponseHead};
use axum::http::HeaderMap;
use serde_json::Value;
use std::collections::HashMap;
use strum_macros::Display;

/// The semantic source a handler parameter is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParamSource {
    /// The request line and headers, as a [`RequestInfo`].
    Request,
    /// A [`ResponseHead`] handle whose mutations are merged into the final
    /// response.
    Response,
    /// The full request header map.
    Headers,
    /// The parsed JSON body.
    Body,
    /// All path parameters of the matched route.
    PathParams,
    /// All query-string parameters.
    Query,
}

/// A request-derived value positioned for one handler parameter.
#[derive(Clone)]
pub enum BoundValue {
    Request(RequestInfo),
    Response(ResponseHead),
    Headers(HeaderMap),
    Body(Value),
    PathParams(HashMap<String, String>),
    Query(HashMap<String, String>),
}

/// Per-method parameter bindings: a sparse map from parameter position to
/// source tag, sized to the method's arity. Built once at registration time
/// and read on every request.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    slots: Vec<Option<ParamSource>>,
}

impl BindingSet {
    pub fn with_arity(arity: usize) -> Self {
        Self {
            slots: vec![None; arity],
        }
    }

    /// Bind position `index` to `source`. Binding an index twice keeps the
    /// last-applied source, matching decorator application order.
    pub fn bind(&mut self, index: usize, source: ParamSource) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(source);
    }

    pub fn get(&self, index: usize) -> Option<ParamSource> {
        self.slots.get(index).copied().flatten()
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    pub fn wants(&self, source: ParamSource) -> bool {
        self.slots.iter().any(|slot| *slot == Some(source))
    }

    /// Materialize the positional argument vector for one request. Unbound
    /// positions yield `None`.
    pub fn extract(&self, context: &RequestContext) -> Vec<Option<BoundValue>> {
        self.slots
            .iter()
            .map(|slot| {
                slot.map(|source| match source {
                    ParamSource::Request => BoundValue::Request(context.request.clone()),
                    ParamSource::Response => BoundValue::Response(context.response.clone()),
                    ParamSource::Headers => BoundValue::Headers(context.headers.clone()),
                    ParamSource::Body => BoundValue::Body(context.body.clone()),
                    ParamSource::PathParams => BoundValue::PathParams(context.params.clone()),
                    ParamSource::Query => BoundValue::Query(context.query.clone()),
                })
            })
            .collect()
    }
}
