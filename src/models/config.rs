//! Scanner configuration
//!
//! Built once from the environment in main and passed by reference into
//! every component. No module reads ambient process state after startup,
//! which keeps the retriever and classifier testable against mocks.

use alloy_primitives::Address;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    build_alchemy_url, is_chain_supported, CHAIN_ID_ETHEREUM, DEFAULT_HOLDER_API_URL,
    DEFAULT_PAGE_SIZE,
};

/// Configuration for one scan run
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Numeric chain ID (EVM chains only)
    pub chain_id: u64,
    /// ERC-20 token under study
    pub token_address: Address,
    /// Minimum balance for the report, as entered (human decimal string).
    /// Converted to base units only after the on-chain decimals lookup.
    pub min_balance: String,
    /// Ledger-indexing API base URL
    pub holder_api_url: String,
    /// Ledger-indexing API key (sent as a request header, never logged)
    pub holder_api_key: String,
    /// JSON-RPC endpoint for code/eth_call queries
    pub rpc_url: String,
    /// Holders requested per page
    pub page_size: u64,
    /// Optional safety valve: stop paginating once this many qualifying
    /// holders have been collected. Off by default; absence of next_offset
    /// is otherwise the only termination condition.
    pub max_holders: Option<usize>,
    /// Where the final JSON report is written
    pub report_path: PathBuf,
}

impl ScanConfig {
    /// Build configuration from environment variables.
    ///
    /// Required: HOLDER_API_KEY, TOKEN_ADDRESS, and either ETH_HTTP_URL or
    /// ALCHEMY_API_KEY. Everything else has defaults.
    pub fn from_env() -> AppResult<Self> {
        let chain_id = match std::env::var("CHAIN_ID") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::invalid_value(format!("Invalid CHAIN_ID: {}", raw)))?,
            Err(_) => CHAIN_ID_ETHEREUM,
        };
        if !is_chain_supported(chain_id) {
            return Err(AppError::unsupported_chain(chain_id));
        }

        let token_raw = std::env::var("TOKEN_ADDRESS")
            .map_err(|_| AppError::missing_env("TOKEN_ADDRESS"))?;
        let token_address = Address::from_str(&token_raw)
            .map_err(|_| AppError::invalid_value(format!("Invalid TOKEN_ADDRESS: {}", token_raw)))?;

        let holder_api_key = match std::env::var("HOLDER_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => return Err(AppError::missing_api_key("HOLDER_API_KEY")),
        };

        let rpc_url = Self::resolve_rpc_url(chain_id)?;

        let min_balance =
            std::env::var("MIN_BALANCE").unwrap_or_else(|_| "25000".to_string());

        let page_size = match std::env::var("PAGE_SIZE") {
            Ok(raw) => {
                let parsed = raw
                    .parse::<u64>()
                    .map_err(|_| AppError::invalid_value(format!("Invalid PAGE_SIZE: {}", raw)))?;
                if parsed == 0 {
                    return Err(AppError::invalid_value("PAGE_SIZE must be at least 1"));
                }
                parsed
            }
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let max_holders = match std::env::var("MAX_HOLDERS") {
            Ok(raw) => Some(raw.parse::<usize>().map_err(|_| {
                AppError::invalid_value(format!("Invalid MAX_HOLDERS: {}", raw))
            })?),
            Err(_) => None,
        };

        let config = Self {
            chain_id,
            token_address,
            min_balance,
            holder_api_url: std::env::var("HOLDER_API_URL")
                .unwrap_or_else(|_| DEFAULT_HOLDER_API_URL.to_string()),
            holder_api_key,
            rpc_url,
            page_size,
            max_holders,
            report_path: std::env::var("REPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./reports/holder_report.json")),
        };

        info!(
            "🔧 Config loaded: chain {} token {} page_size {}",
            config.chain_id, config.token_address, config.page_size
        );
        Ok(config)
    }

    /// Resolve the JSON-RPC endpoint: explicit ETH_HTTP_URL wins, otherwise
    /// the URL is built from ALCHEMY_API_KEY. The key is never logged.
    fn resolve_rpc_url(chain_id: u64) -> AppResult<String> {
        if let Ok(url) = std::env::var("ETH_HTTP_URL") {
            if !url.is_empty() {
                return Ok(url);
            }
        }

        if let Ok(key) = std::env::var("ALCHEMY_API_KEY") {
            if !key.is_empty() && key != "YOUR_API_KEY" {
                info!("🔑 Using ALCHEMY_API_KEY (key hidden)");
                if let Some(url) = build_alchemy_url(chain_id, &key) {
                    return Ok(url);
                }
            }
        }

        Err(AppError::missing_env("ETH_HTTP_URL or ALCHEMY_API_KEY"))
    }
}
