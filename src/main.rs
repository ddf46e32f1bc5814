use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::Context;
use axum::Router;
use shurjopay_connect::{
    Config, Shurjopay, connect,
    reliability::{Policy, ResilientShurjopay},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    match dotenvy::dotenv() {
        Ok(p) => tracing::info!(path = %p.display(), "Loaded environment variables from .env file"),
        Err(e) => tracing::warn!("Failed to load environment variables from .env: {e}"),
    };

    let config = Config::from_env().context("shurjoPay configuration")?;
    let policy = Policy::from_env().context("gateway policy configuration")?;
    tracing::info!(endpoint = %config.endpoint, ?policy, "Configured shurjoPay gateway");
    let gateway = ResilientShurjopay::new(Shurjopay::new(config), policy);
    let state = AppState::new(gateway);

    let app = Router::new()
        .merge(connect::api::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3030);

    let listener = tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("bind port {port}"))?;

    tracing::info!("Serving on port {port}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
