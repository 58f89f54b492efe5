use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use simutwin_core::HandoffPolicy;
use simutwin_server::{ServerConfig, serve};
use tracing_subscriber::EnvFilter;

/// SimuTwin production-line simulation server.
#[derive(Parser, Debug)]
#[command(name = "simutwin-server", version, about)]
struct Args {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:4000].
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Milliseconds per simulation tick [default: 1000].
    #[arg(long)]
    tick_ms: Option<u64>,

    /// What a machine does with a finished product when the next one is
    /// busy: drop or block [default: drop].
    #[arg(long)]
    handoff_policy: Option<HandoffPolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,simutwin_server=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(policy) = args.handoff_policy {
        config.handoff_policy = policy;
    }

    tracing::debug!(?config, "configuration resolved");
    serve(config).await?;
    Ok(())
}
