//! GnoBounty Gateway API Server
//!
//! Usage:
//!   cargo run --bin gnobounty_api
//!
//! Environment:
//!   GNOBOUNTY_RPC_URL          - Tendermint RPC endpoint (default: https://rpc.gno.land:443)
//!   GNOBOUNTY_REALM            - Realm package path (default: gno.land/r/greg007/gnobounty_v2)
//!   GNOBOUNTY_HOST             - Server host (default: 0.0.0.0)
//!   PORT / GNOBOUNTY_PORT      - Server port (default: 8080)
//!   GNOBOUNTY_RPC_TIMEOUT_SECS - Per-call timeout (default: 10)
//!   GNOBOUNTY_RPC_RETRIES      - Extra attempts on timeouts (default: 1)
//!   RUST_LOG                   - Log filter (default: info)

use gnobounty_gateway::utils::constants::{APP_NAME, APP_VERSION};
use gnobounty_gateway::{
    create_router, AppState, BountyService, GatewayConfig, RealmFacade, RealmQuery, RpcClient,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = GatewayConfig::from_env()?;

    let rpc: Arc<dyn RealmQuery> = Arc::new(RpcClient::new(&config)?);
    let service = BountyService::new(RealmFacade::new(rpc));
    let state = Arc::new(AppState::new(service, config.realm_path.clone()));

    let app = create_router(state);
    let addr = config.bind_addr()?;

    info!("{} v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  GET /api/bounties                      - All bounties");
    info!("  GET /api/bounties/:id                  - One bounty");
    info!("  GET /api/bounties/:id/applications     - Applications for a bounty");
    info!("  GET /api/leaderboard                   - Leaderboard");
    info!("  GET /api/user/:address/bounties        - Bounties created by a user");
    info!("  GET /api/user/:address/applications    - Applications submitted by a user");
    info!("  GET /health                            - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Shutdown complete");
    Ok(())
}
