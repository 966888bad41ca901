//! cpuinfo_agent: serves processor topology parsed from /proc/cpuinfo as JSON.

mod config;
mod cpuinfo;
mod error;
mod http;
mod state;
mod tls;
mod topology;
mod types;

use anyhow::Context;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = match config::parse_args(std::env::args()) {
        Ok(c) => c,
        Err(msg) if msg.starts_with("Usage:") => {
            println!("{msg}");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = http::router(AppState::new(cfg.cpuinfo_path.clone()));
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));

    if cfg.enable_ssl {
        let (cert, key) = tls::ensure_self_signed_cert()?;
        let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert, &key)
            .await
            .with_context(|| format!("load TLS material from {}", cert.display()))?;

        let handle = axum_server::Handle::new();
        let shutdown = handle.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.graceful_shutdown(Some(Duration::from_secs(5)));
        });

        info!(%addr, report = %cfg.cpuinfo_path.display(), "cpuinfo agent listening (https)");
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("https server")?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        info!(
            addr = %listener.local_addr().unwrap_or(addr),
            report = %cfg.cpuinfo_path.display(),
            "cpuinfo agent listening (http)"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("http server")?;
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        // no signal handler: run until killed
        Err(_) => std::future::pending::<()>().await,
    }
}
