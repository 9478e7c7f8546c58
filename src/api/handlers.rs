//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

use super::types::HealthData;
use crate::core::service::BountyService;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Bounty, BountyApplication, LeaderboardEntry, UserApplication};

/// Shared application state
pub struct AppState {
    pub service: BountyService,
    pub realm_path: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: BountyService, realm_path: impl Into<String>) -> Self {
        Self {
            service,
            realm_path: realm_path.into(),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Path ids are plain unsigned integers; anything else never reaches the realm
fn parse_id(raw: &str) -> AppResult<u64> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("invalid bounty id: {}", raw)))
}

fn log_failure(route: &'static str, err: &AppError) {
    error!(route, code = err.code_str(), error = %err, "Request failed");
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthData> {
    Json(HealthData::healthy(state.uptime_seconds(), &state.realm_path))
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}

// ============================================
// Bounties
// ============================================

pub async fn list_bounties(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Bounty>>> {
    state.service.list_bounties().await.map(Json).map_err(|e| {
        log_failure("list_bounties", &e);
        e
    })
}

/// Any failure, transport included, is a 404
pub async fn get_bounty(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Bounty>> {
    let id = parse_id(&id)?;
    state
        .service
        .get_bounty(id)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(bounty_id = id, error = %e, "Bounty lookup failed");
            e.into_not_found()
        })
}

/// Never an error: failures degrade to an empty list
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<BountyApplication>> {
    let result = match parse_id(&id) {
        Ok(id) => state.service.list_applications(id).await,
        Err(e) => Err(e),
    };

    Json(result.unwrap_or_else(|e| {
        warn!(bounty_id = %id, error = %e, "Applications unavailable, returning empty list");
        Vec::new()
    }))
}

// ============================================
// Leaderboard
// ============================================

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    state.service.leaderboard().await.map(Json).map_err(|e| {
        log_failure("leaderboard", &e);
        e
    })
}

// ============================================
// Per-user views
// ============================================

pub async fn user_bounties(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> AppResult<Json<Vec<Bounty>>> {
    state.service.user_bounties(&address).await.map(Json).map_err(|e| {
        log_failure("user_bounties", &e);
        e
    })
}

pub async fn user_applications(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> AppResult<Json<Vec<UserApplication>>> {
    state
        .service
        .user_applications(&address)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("user_applications", &e);
            e
        })
}
