use chrono::Utc;
use hotel_dashboard::{page::Page, router, AppState, Config, Dashboard, FileStorage};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let storage = FileStorage::new(&config.data_path);
    info!(path = %config.data_path.display(), "using data file");

    let page = Page::hotel_dashboard("/", config.viewport_width);
    let dashboard = Dashboard::start(
        page,
        Box::new(storage),
        config.timings,
        config.sample_seed,
        Utc::now(),
    );
    let state = AppState::new(dashboard);
    let pump = tokio::spawn(state.clone().drive(config.tick));

    let app = router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    pump.abort();
    if let Err(err) = state.run_blocking(Dashboard::shutdown).await {
        error!("final flush failed: {}", err.message);
    }
    info!("shut down");

    Ok(())
}
