//! # Armature
//!
//! A decorator-style web framework with controller routing and built-in
//! dependency injection for Rust.
//!
//! Armature wraps axum with two pieces of machinery: a lazy singleton DI
//! container, and a route-metadata layer that binds request-derived data
//! (headers, body, path params, query, request/response handles) to
//! controller method parameters by position.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use armature::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct Note {
//!     id: u64,
//!     title: String,
//! }
//!
//! #[derive(Deserialize)]
//! pub struct CreateNote {
//!     title: String,
//! }
//!
//! // 1. Define a service; dependencies are `Arc` fields.
//! #[derive(Injectable)]
//! pub struct NoteService {}
//!
//! impl NoteService {
//!     pub async fn create(&self, title: String) -> Note {
//!         Note { id: 1, title }
//!     }
//! }
//!
//! // 2. Define a controller; parameter attributes declare the bindings.
//! #[controller(path = "/notes")]
//! pub struct NoteController {
//!     service: Arc<NoteService>,
//! }
//!
//! #[routes(NoteController)]
//! impl NoteController {
//!     #[post("/")]
//!     pub async fn create(&self, #[body] request: CreateNote) -> ApiResponse<Note> {
//!         ApiResponse::created(self.service.create(request.title).await)
//!     }
//! }
//!
//! // 3. Group registrations in a module.
//! #[module(providers = [NoteService])]
//! pub struct AppModule;
//!
//! // 4. Bootstrap.
//! #[tokio::main]
//! async fn main() -> armature::Result<()> {
//!     let app = AppBuilder::new()
//!         .module::<AppModule>()
//!         .controller::<NoteController>()
//!         .build()?;
//!     app.listen().await
//! }
//! ```

pub mod app;
pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod error;
pub mod lifecycle;
pub mod module;
pub mod routing;

// Re-export core types
pub use app::{App, AppBuilder, AppConfig, AppState};
pub use common::{ApiError, ApiResponse, StatusCode};
pub use config::ConfigService;
pub use controller::Controller;
pub use di::{Container, ContainerBuilder, HasContainer, Inject, Injectable, Lazy};
pub use error::{ArmatureError, Result};
pub use module::Module;

// Re-export macros
pub use armature_macro::{
    Injectable as DeriveInjectable, body, controller, delete, get, headers, module, param, patch,
    post, put, query, request, response, routes,
};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use armature::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{App, AppBuilder, AppConfig, AppState};
    pub use crate::common::{ApiError, ApiResponse, StatusCode};
    pub use crate::config::ConfigService;
    pub use crate::controller::Controller;
    pub use crate::di::{Container, ContainerBuilder, HasContainer, Inject, Injectable, Lazy};
    pub use crate::error::{ArmatureError, Result};
    pub use crate::lifecycle::{OnApplicationShutdown, shutdown_signal};
    pub use crate::module::Module;
    pub use crate::routing::{
        BindingSet, BoundValue, HttpMethod, ParamSource, RequestInfo, ResponseHead, Route,
        RouteDefinition, RouteRegistry,
    };
    pub use crate::{
        DeriveInjectable as Injectable, body, controller, delete, get, headers, module, param,
        patch, post, put, query, request, response, routes,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        http::StatusCode as HttpStatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
