use armature::prelude::*;

mod app_module;
mod modules;

use app_module::AppModule;
use modules::health::HealthController;
use modules::note::NoteController;

struct FlushLog;

#[async_trait]
impl OnApplicationShutdown for FlushLog {
    async fn on_application_shutdown(&self) -> armature::Result<()> {
        tracing::info!("demo server shutting down");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env(&ConfigService::new());
    tracing::info!(
        host = %config.host,
        port = config.port,
        prefix = %config.api_prefix,
        "starting demo server"
    );

    let app = AppBuilder::new()
        .config(config)
        .module::<AppModule>()
        .controller::<NoteController>()
        .controller::<HealthController>()
        .on_shutdown("flush-log", Arc::new(FlushLog))
        .build()?;

    app.listen().await?;
    Ok(())
}
