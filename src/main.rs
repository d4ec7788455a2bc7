//! Ad Report Proxy - CSV reports over an advertising-metrics API
//!
//! Serves per-platform and cross-platform CSV reports built from upstream
//! insight data, one blocking fetch sequence per request.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adreport_backend::{api::create_router, config::Config, upstream::StractApi};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::new();
    let addr = config.bind_addr.clone();
    info!("starting ad report proxy against {}", config.base_url);

    let api = Arc::new(StractApi::new(config));
    let app = create_router(api);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("report server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adreport_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
