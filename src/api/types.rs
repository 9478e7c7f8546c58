//! API Response Types

use serde::Serialize;

use crate::utils::constants::APP_VERSION;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Realm package path this gateway reads from
    pub realm: String,
    /// Unix seconds
    pub timestamp: i64,
}

impl HealthData {
    pub fn healthy(uptime_seconds: u64, realm: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            version: APP_VERSION.to_string(),
            uptime_seconds,
            realm: realm.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
