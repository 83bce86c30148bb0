//! Application bootstrap: configuration, module/controller registration,
//! route mounting, and the listen loop with graceful shutdown.
//!
//! Startup sequence, all before the listener binds:
//!
//! 1. run every registered module (providers, bindings — cheap, lazy)
//! 2. instantiate controllers through the injector and mount their routes
//!    (duplicate (verb, path) claims abort here)
//! 3. build the axum router
//!
//! Any failure aborts `build()`; no route is reachable before registration
//! completes.

use crate::config::ConfigService;
use crate::controller::Controller;
use crate::di::{Container, HasContainer};
use crate::error::{ArmatureError, Result};
use crate::lifecycle::{OnApplicationShutdown, ShutdownHooks, shutdown_signal};
use crate::module::Module;
use crate::routing::RouteRegistry;
use axum::Router;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Prefix every route is nested under. Empty disables prefixing.
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_prefix: "api".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Read `API_PREFIX`, `HOST` and `PORT`, falling back to the defaults.
    pub fn from_env(config: &ConfigService) -> Self {
        let defaults = Self::default();
        Self {
            api_prefix: config.get_or("API_PREFIX", &defaults.api_prefix),
            host: config.get_or("HOST", &defaults.host),
            port: config
                .get("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// Router state: hands the DI container to extractors like
/// [`Inject`](crate::di::Inject).
#[derive(Clone)]
pub struct AppState {
    container: Arc<Container>,
}

impl HasContainer for AppState {
    fn get_container(&self) -> &Container {
        &self.container
    }
}

type MountFn = Box<dyn FnOnce(&Container, &mut RouteRegistry) -> Result<()>>;
type RouterFn = Box<dyn FnOnce(Router<AppState>) -> Router<AppState>>;

/// Fluent builder assembling the application: explicit registration replaces
/// the filesystem scanning a decorator framework would do at import time.
pub struct AppBuilder {
    config: AppConfig,
    container: Container,
    modules: Vec<fn(&Container) -> Result<()>>,
    mounts: Vec<MountFn>,
    router_hooks: Vec<RouterFn>,
    shutdown_hooks: ShutdownHooks,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            container: Container::new(),
            modules: Vec::new(),
            mounts: Vec::new(),
            router_hooks: Vec::new(),
            shutdown_hooks: ShutdownHooks::default(),
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a module; its providers and bindings are recorded during
    /// `build`.
    pub fn module<M: Module>(mut self) -> Self {
        self.modules.push(M::register);
        self
    }

    /// Register and mount a controller. The controller is instantiated
    /// through the injector at `build` time, so its dependencies resolve
    /// then, and each of its routes is claimed with the registry.
    pub fn controller<C: Controller>(mut self) -> Self {
        self.mounts.push(Box::new(|container, registry| {
            container.register::<C>();
            let instance = container.get::<C>()?;
            registry.register_controller(C::base_path(), C::routes(instance))
        }));
        self
    }

    /// Seed the container with a value built outside the graph.
    pub fn register_instance<T: Send + Sync + 'static>(self, instance: T) -> Self {
        self.container.register_instance(instance);
        self
    }

    /// Customize the router before the state is applied: add plain axum
    /// routes, tower layers, fallbacks.
    pub fn map_router<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Router<AppState>) -> Router<AppState> + 'static,
    {
        self.router_hooks.push(Box::new(f));
        self
    }

    pub fn on_shutdown(
        mut self,
        name: impl Into<String>,
        hook: Arc<dyn OnApplicationShutdown>,
    ) -> Self {
        self.shutdown_hooks.register(name, hook);
        self
    }

    /// Run the startup sequence and produce a ready-to-serve [`App`].
    pub fn build(self) -> Result<App> {
        let Self {
            config,
            container,
            modules,
            mounts,
            router_hooks,
            shutdown_hooks,
        } = self;

        for register in modules {
            register(&container)?;
        }

        let mut registry = RouteRegistry::new(&config.api_prefix);
        for mount in mounts {
            mount(&container, &mut registry)?;
        }
        tracing::info!(
            routes = registry.len(),
            prefix = %config.api_prefix,
            "application routes registered"
        );

        let container = Arc::new(container);
        let state = AppState {
            container: Arc::clone(&container),
        };
        let mut router: Router<AppState> = registry.into_router();
        for hook in router_hooks {
            router = hook(router);
        }
        let router = router.with_state(state);

        Ok(App {
            config,
            container,
            router,
            shutdown_hooks,
        })
    }
}

/// A fully assembled application: every module loaded, every route mounted.
pub struct App {
    config: AppConfig,
    container: Arc<Container>,
    router: Router,
    shutdown_hooks: ShutdownHooks,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// A clone of the built router, e.g. for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured address and serve until a shutdown signal
    /// arrives, then run the shutdown hooks.
    pub async fn listen(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ArmatureError::Internal(format!("failed to bind {addr}: {e}")))?;
        tracing::info!("listening on http://{addr}");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                shutdown_signal().await;
                tracing::info!("shutdown signal received, draining connections");
            })
            .await
            .map_err(|e| ArmatureError::Internal(format!("server error: {e}")))?;

        self.shutdown_hooks.run().await;
        Ok(())
    }
}
