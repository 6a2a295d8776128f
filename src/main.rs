//! slobweb server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use slobweb::dict::Dict;
use slobweb::router::build_router;
use slobweb::state::AppState;

#[derive(Parser)]
#[command(name = "slobweb")]
#[command(about = "Minimalistic web front-end for dictionary containers")]
struct Cli {
    /// Dictionary container file(s) to serve
    #[arg(required = true)]
    slob: Vec<PathBuf>,

    /// Port for the web server to listen on
    #[arg(short, long, default_value_t = 8013)]
    port: u16,

    /// Network interface for the web server to listen on
    #[arg(short, long, default_value = "127.0.0.1")]
    interface: String,

    /// Maximum number of keys a lookup may return
    #[arg(short, long, default_value_t = 100)]
    limit: usize,

    /// Open a web browser on the lookup page after startup
    #[arg(short, long)]
    browse: bool,

    /// Website root, for serving behind a reverse proxy
    #[arg(short, long, default_value = "/")]
    mount_path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,slobweb=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut dicts = Vec::with_capacity(cli.slob.len());
    for path in &cli.slob {
        let dict =
            Dict::open(path).with_context(|| format!("failed to open container {path:?}"))?;
        tracing::info!(
            "opened {} ({}, {} keys, {} blobs)",
            path.display(),
            dict.label(),
            dict.len(),
            dict.blob_count()
        );
        dicts.push(Arc::new(dict));
    }

    let state = AppState::new(dicts, cli.limit, &cli.mount_path);
    let mount = state.mount.clone();
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", cli.interface, cli.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cli.interface, cli.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("slobweb listening on http://{addr}{mount}/lookup");

    if cli.browse {
        let host = if cli.interface == "0.0.0.0" {
            "localhost".to_string()
        } else {
            cli.interface.clone()
        };
        let url = format!("http://{host}:{}{mount}/lookup", cli.port);
        if let Err(e) = open::that(&url) {
            tracing::warn!("failed to open browser on {url}: {e}");
        }
    }

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
