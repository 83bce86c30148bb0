//! Shutdown signalling and hooks: SIGINT/SIGTERM end `App::listen`, then
//! registered hooks run after the server stops accepting connections.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::signal;

/// Called when the application is shutting down, after the listener has
/// drained. Use it to close connections, flush buffers, stop background
/// work.
#[async_trait]
pub trait OnApplicationShutdown: Send + Sync {
    async fn on_application_shutdown(&self) -> crate::Result<()>;
}

/// Ordered collection of shutdown hooks. Failures are logged, not
/// propagated: one bad hook must not keep the rest from running.
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: Vec<(String, Arc<dyn OnApplicationShutdown>)>,
}

impl ShutdownHooks {
    pub fn register(&mut self, name: impl Into<String>, hook: Arc<dyn OnApplicationShutdown>) {
        self.hooks.push((name.into(), hook));
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn run(&self) {
        for (name, hook) in &self.hooks {
            if let Err(err) = hook.on_application_shutdown().await {
                tracing::error!(hook = %name, "shutdown hook failed: {err}");
            }
        }
    }
}

/// Completes when SIGINT (Ctrl+C) or, on unix, SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM signal");
        },
    }
}
