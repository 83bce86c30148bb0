//! Route metadata and dispatch: the registration table mapping controller
//! methods and parameter positions to request-derived data sources, and the
//! registry that compiles it into an axum router.

mod binding;
pub mod bound;
mod context;
mod metadata;
mod registry;

pub use binding::{BindingSet, BoundValue, ParamSource};
pub use context::{RequestContext, RequestInfo, ResponseHead};
pub use metadata::{DynHandler, HandlerFuture, HttpMethod, Route, RouteDefinition};
pub use registry::RouteRegistry;
