//! GnoBounty Gateway Library
//!
//! Read-only HTTP gateway over the gno.land bounty realm:
//! - Evaluates realm expressions over Tendermint JSON-RPC
//! - Parses the textual value encoding into bounties, applications
//!   and leaderboard entries
//! - Serves them as JSON to the web frontend

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{BountyDecoder, BountyService, GlobalScan};
pub use api::{create_router, AppState};
pub use models::{
    AppError, AppResult, ApplicationStatus, Bounty, BountyApplication, ErrorCode, GatewayConfig,
    LeaderboardEntry, UserApplication,
};
pub use providers::{RealmFacade, RealmQuery, RpcClient};
