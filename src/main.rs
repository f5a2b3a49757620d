//! Grit goal server.
//!
//! # Architecture Overview
//!
//! ```text
//!     HTTP / grit-cli
//!         │
//!         ▼
//!   ┌──────────┐    ┌─────────────┐    ┌────────────────────┐
//!   │   http   │───▶│   session   │───▶│ blockchain         │───▶ JSON-RPC
//!   │  router  │    │ guard + view│    │ wallet + GritNFT   │
//!   └──────────┘    └──────┬──────┘    └────────────────────┘
//!                          │
//!                          ▼
//!                   ┌─────────────┐
//!                   │    goal     │  decode, status, display
//!                   └─────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use grit_nft::blockchain::{BlockchainClient, GritNftContract, LocalWalletProvider, Wallet};
use grit_nft::config::load_or_default;
use grit_nft::goal::SystemTimeSource;
use grit_nft::lifecycle::{wait_for_shutdown_signal, Shutdown};
use grit_nft::observability::{analytics, logging, metrics};
use grit_nft::session::{GoalSession, SessionSettings};
use grit_nft::GritServer;

#[derive(Parser)]
#[command(name = "grit-server")]
#[command(about = "Serve habit commitment goals backed by the GritNFT contract", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long, env = "GRIT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("grit-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.contract.address,
        bind_address = %config.http.bind_address,
        "Configuration loaded"
    );

    let app = analytics::init(&config.analytics);
    tracing::info!(enabled = app.is_enabled(), "Analytics initialized");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = BlockchainClient::new(config.blockchain.clone()).await?;
    let healthy = client.is_healthy().await;
    metrics::record_rpc_health(healthy);
    if !healthy {
        tracing::warn!(rpc_url = %client.rpc_url(), "RPC endpoint not reachable yet");
    }

    let wallet = match Wallet::from_env() {
        Ok(wallet) => Some(wallet),
        Err(e) => {
            tracing::warn!(error = %e, "No wallet configured; goals can be read but not minted");
            None
        }
    };

    let contract = GritNftContract::connect(&client, &config.contract, wallet.as_ref())?;
    let provider = LocalWalletProvider::new(wallet, client);
    let settings = SessionSettings::from_config(&config)?;

    let session = Arc::new(GoalSession::new(
        Arc::new(provider),
        Arc::new(contract),
        Arc::new(SystemTimeSource),
        settings,
    ));

    match session.check_if_wallet_is_connected().await {
        Ok(Some(account)) => {
            if let Err(e) = session.fetch_all(account).await {
                tracing::warn!(error = %e, "Initial goal load failed");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Wallet lookup failed"),
    }
    if let Err(e) = session.check_network().await {
        tracing::warn!(error = %e, "Network check failed");
    }

    let listener = TcpListener::bind(&config.http.bind_address).await?;
    let server = GritServer::new(&config, session);

    let shutdown = Shutdown::new();
    let serve = server.run(listener, &shutdown);
    tokio::pin!(serve);

    let signalled = tokio::select! {
        served = &mut serve => {
            served?;
            false
        }
        _ = wait_for_shutdown_signal() => true,
    };

    if signalled {
        tracing::info!("Draining in-flight requests");
        shutdown.trigger();
        serve.await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
