use std::sync::Arc;

use mojang_status::config::{AppConfig, load_config};
use mojang_status::console::ConsolePresenter;
use mojang_status::engine::{Presenter, StatusEngine};
use mojang_status::http_probe::report;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("{}", report(&e));
        std::process::exit(1);
    }
}

async fn run() -> mojang_status::Result<()> {
    let AppConfig {
        registry,
        engine: settings,
        auto_refresh,
        elapsed_refresh,
        export_dir,
    } = load_config()?;

    log::info!(
        "Watching {} services in {} categories",
        registry.service_count(),
        registry.categories().len()
    );

    let engine = Arc::new(StatusEngine::with_http(registry, settings)?.with_presenter(ConsolePresenter));

    match engine.run_cycle().await {
        Ok(snapshot) => ConsolePresenter.present_snapshot(&snapshot),
        Err(e) => ConsolePresenter.present_error(&format!("Failed to check status: {e}")),
    }

    if let Some(dir) = export_dir {
        let artifact = engine.export_snapshot()?;
        let path = dir.join(&artifact.filename);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(&path, &artifact.bytes).await?;
        log::info!("Exported registry to {}", path.display());
    }

    engine.set_auto_refresh(auto_refresh);
    let elapsed = engine.watch_elapsed(elapsed_refresh);

    tokio::signal::ctrl_c().await?;
    log::info!("Shutdown signal received");
    engine.set_auto_refresh(false);
    elapsed.abort();
    Ok(())
}
