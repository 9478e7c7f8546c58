//! RPC Client Module - gno.land Tendermint JSON-RPC
//!
//! Read-only evaluation goes through `abci_query` on path `vm/qeval` with
//! `base64("<realm>.<expression>")` as data. The node answers with the
//! textual value encoding, base64-encoded, in `ResponseBase.Data`.
//!
//! Hardening over a bare call:
//! 1. Per-request timeout on the HTTP client
//! 2. Bounded retry on timeouts and connection failures, with jitter

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::realm::RealmQuery;
use crate::models::config::GatewayConfig;
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    QEVAL_PATH, RETRY_BASE_DELAY_MS, RETRY_JITTER_PERCENT, USER_AGENT as USER_AGENT_CONST,
};

/// RPC client bound to one node and one realm
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    realm_path: String,
    retries: u32,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.rpc_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.rpc_url.clone(),
            realm_path: config.realm_path.clone(),
            retries: config.rpc_retries,
            client,
        })
    }

    /// Evaluate `expression` inside the realm and return the raw reply text
    pub async fn qeval(&self, expression: &str) -> AppResult<String> {
        let payload = qeval_request(&self.realm_path, expression);
        let mut attempt = 0;

        loop {
            match self.execute(&payload).await {
                Ok(text) => return Ok(text),
                Err(e) if e.code.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    let delay = retry_delay();
                    warn!(
                        expression,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying realm query"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One round trip, no retry
    async fn execute(&self, payload: &serde_json::Value) -> AppResult<String> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::rpc_error(format!("HTTP error: {}", status)));
        }

        let reply: RpcResponse = response.json().await?;
        decode_reply(reply)
    }
}

#[async_trait]
impl RealmQuery for RpcClient {
    async fn eval(&self, expression: &str) -> AppResult<String> {
        self.qeval(expression).await
    }
}

fn qeval_request(realm_path: &str, expression: &str) -> serde_json::Value {
    let data = BASE64.encode(format!("{}.{}", realm_path, expression));
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "abci_query",
        "params": [QEVAL_PATH, data, "0", false]
    })
}

/// Base delay with ±RETRY_JITTER_PERCENT jitter
fn retry_delay() -> Duration {
    let jitter_range = (RETRY_BASE_DELAY_MS * RETRY_JITTER_PERCENT) / 100;
    let jitter: i64 = rand::thread_rng().gen_range(-(jitter_range as i64)..=(jitter_range as i64));
    Duration::from_millis((RETRY_BASE_DELAY_MS as i64 + jitter).max(0) as u64)
}

fn decode_reply(reply: RpcResponse) -> AppResult<String> {
    if let Some(error) = reply.error {
        let detail = error.data.map(|d| d.to_string()).unwrap_or_default();
        return Err(AppError::rpc_error(format!(
            "RPC error: {} (code: {}) {}",
            error.message, error.code, detail
        )));
    }

    let base = reply
        .result
        .ok_or_else(|| AppError::invalid_response("No result in response"))?
        .response
        .response_base;

    if base.error.as_ref().is_some_and(|e| !e.is_null()) {
        return Err(AppError::rpc_error(if base.log.is_empty() {
            "Realm evaluation failed".to_string()
        } else {
            base.log
        }));
    }

    let bytes = match base.data {
        Some(data) => BASE64.decode(data)?,
        None => Vec::new(),
    };
    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!(bytes = bytes.len(), "qeval reply decoded");
    Ok(text)
}

/// JSON-RPC envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<AbciQueryResult>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct AbciQueryResult {
    response: AbciResponse,
}

#[derive(Debug, Deserialize)]
struct AbciResponse {
    #[serde(rename = "ResponseBase")]
    response_base: ResponseBase,
}

#[derive(Debug, Deserialize)]
struct ResponseBase {
    #[serde(rename = "Error", default)]
    error: Option<serde_json::Value>,
    #[serde(rename = "Data", default)]
    data: Option<String>,
    #[serde(rename = "Log", default)]
    log: String,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}
