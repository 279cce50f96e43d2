use anyhow::Context;
use herald_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use herald_app::modules;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load HERALD settings")?;

    herald_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        bookinfo = %settings.bookinfo.base_url,
        oauth_enabled = settings.oauth.enabled,
        "herald-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();

    modules::register_all(&mut registry, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("herald-app bootstrap complete");

    herald_http::start_server(&registry, &settings).await?;

    registry.stop_modules().await?;

    Ok(())
}
