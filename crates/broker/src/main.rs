use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use broker::config::BrokerConfig;
use broker::http_api::{router, AppState};
use broker::search::SearchService;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = BrokerConfig::from_env();

    let started = Instant::now();
    let svc = SearchService::open(Path::new(&cfg.index_dir), cfg.max_scanned)
        .with_context(|| format!("open index {}", cfg.index_dir))?;
    tracing::info!(
        index_dir = %cfg.index_dir,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "index loaded"
    );

    let app = router(AppState { svc: Arc::new(svc) });

    let addr: SocketAddr = cfg.addr.parse().with_context(|| format!("bad addr {}", cfg.addr))?;
    tracing::info!(address = %addr, "broker listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
