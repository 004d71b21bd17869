//! JSON-RPC Provider
//!
//! Thin JSON-RPC 2.0 client used for the classification queries:
//! - eth_getCode (code-presence check)
//! - eth_call (multisig owners probe, ERC-20 decimals lookup)
//!
//! Deliberately single attempt per call: the retry budget in this tool
//! belongs to the paginated holder retrieval, not to node queries. The
//! client does carry a request timeout and custom User-Agent header.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_SECS, USER_AGENT as USER_AGENT_CONST};

sol! {
    function decimals() external view returns (uint8);
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC provider for a single endpoint
#[derive(Debug, Clone)]
pub struct RpcProvider {
    url: String,
    client: reqwest::Client,
}

impl RpcProvider {
    /// Create a provider for the given HTTP endpoint
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorCode::RpcConnectionFailed,
                    "Failed to build HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Execute a single JSON-RPC call (no retry, no fallback)
    async fn call_rpc<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> AppResult<T> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        debug!("🌐 RPC {}", method);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorCode::RpcConnectionFailed, "RPC request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::new(
                ErrorCode::RpcError,
                format!("HTTP error: {}", status),
            ));
        }

        let body: RpcResponse<T> = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorCode::RpcInvalidResponse,
                "Failed to parse RPC response",
                e,
            )
        })?;

        if let Some(error) = body.error {
            return Err(AppError::new(
                ErrorCode::RpcError,
                format!("RPC error: {} (code: {})", error.message, error.code),
            ));
        }

        body.result
            .ok_or_else(|| AppError::new(ErrorCode::RpcInvalidResponse, "No result in RPC response"))
    }

    /// Fetch deployed bytecode at an address. Empty for plain accounts.
    pub async fn get_code(&self, address: Address) -> AppResult<Vec<u8>> {
        let params = serde_json::json!([address.to_string(), "latest"]);
        let code: String = self.call_rpc("eth_getCode", params).await?;
        decode_hex(&code)
    }

    /// Execute eth_call against a contract, returning the raw return data
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> AppResult<Vec<u8>> {
        let params = serde_json::json!([
            { "to": to.to_string(), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let ret: String = self.call_rpc("eth_call", params).await?;
        decode_hex(&ret)
    }

    /// ERC-20 decimals() lookup, used once per run for threshold conversion
    pub async fn token_decimals(&self, token: Address) -> AppResult<u8> {
        let calldata = decimalsCall {}.abi_encode();
        let ret = self.eth_call(token, &calldata).await?;
        let decoded = decimalsCall::abi_decode_returns(&ret, true).map_err(|e| {
            AppError::with_source(
                ErrorCode::RpcInvalidResponse,
                format!("Failed to decode decimals() for {}", token),
                e,
            )
        })?;
        Ok(decoded._0)
    }
}

fn decode_hex(s: &str) -> AppResult<Vec<u8>> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| {
        AppError::with_source(ErrorCode::RpcInvalidResponse, "Invalid hex in RPC response", e)
    })
}
