//! Paginated Holder Retrieval
//!
//! Talks to the ledger-indexing API and walks its offset-based pagination
//! until the API stops returning a next_offset. Per-page threshold filtering
//! bounds memory; per-request retry with exponential backoff absorbs 429s
//! and transient transport failures.
//!
//! Split in two layers:
//! - `HolderApiClient`: one raw HTTP request per call, no policy
//! - `HolderRetriever`: pagination loop, filtering, retry budget, pacing
//!
//! The `PageFetcher` seam lets tests drive the retriever with scripted pages.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::config::ScanConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::HolderRecord;
use crate::utils::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, HOLDER_API_KEY_HEADER, MAX_PAGE_ATTEMPTS, PAGE_BACKOFF_BASE_MS,
    PAGE_PACING_MS, USER_AGENT as USER_AGENT_CONST,
};

/// One raw holder entry as returned by the indexing API
#[derive(Debug, Clone, Deserialize)]
pub struct RawHolder {
    pub address: String,
    /// Balance in the token's smallest unit, as a decimal string
    pub balance: String,
}

/// One page of the holders listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolderPage {
    #[serde(default)]
    pub items: Vec<RawHolder>,
    /// Opaque cursor for the next page; None signals the final page
    #[serde(default)]
    pub next_offset: Option<u64>,
}

/// Envelope around the holders payload
#[derive(Debug, Deserialize)]
struct HolderApiResponse {
    data: Option<HolderPage>,
}

/// A source of raw holder pages. One call is one request; retry policy
/// lives in the retriever.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page_size: u64, offset: Option<u64>) -> AppResult<HolderPage>;
}

/// HTTP client for the ledger-indexing API
pub struct HolderApiClient {
    client: reqwest::Client,
    base_url: String,
    chain_id: u64,
    token_address: Address,
}

impl HolderApiClient {
    /// Build a client from the scan configuration. The API key goes into a
    /// default request header and is never logged.
    pub fn new(config: &ScanConfig) -> AppResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT_CONST),
        );
        let key_value = reqwest::header::HeaderValue::from_str(&config.holder_api_key)
            .map_err(|_| AppError::invalid_value("HOLDER_API_KEY contains invalid characters"))?;
        headers.insert(HOLDER_API_KEY_HEADER, key_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorCode::HolderApiHttp, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.holder_api_url.trim_end_matches('/').to_string(),
            chain_id: config.chain_id,
            token_address: config.token_address,
        })
    }
}

#[async_trait]
impl PageFetcher for HolderApiClient {
    async fn fetch_page(&self, page_size: u64, offset: Option<u64>) -> AppResult<HolderPage> {
        let url = format!("{}/token/holders", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("chain_id", self.chain_id.to_string()),
            ("contract_address", self.token_address.to_string()),
            ("page_size", page_size.to_string()),
        ]);
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset.to_string())]);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorCode::HolderApiHttp, "Holder API request failed", e)
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::rate_limited());
        }
        if !status.is_success() {
            return Err(AppError::new(
                ErrorCode::HolderApiHttp,
                format!("HTTP error: {}", status),
            ));
        }

        let body: HolderApiResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorCode::HolderApiInvalidResponse,
                "Failed to parse holder API response",
                e,
            )
        })?;

        body.data
            .ok_or_else(|| AppError::invalid_holder_response("Missing data field in response"))
    }
}

/// Walks the paginated holders listing and keeps every holder whose balance
/// meets the threshold (inclusive lower bound, exact integer comparison).
pub struct HolderRetriever<F: PageFetcher> {
    fetcher: F,
    page_size: u64,
    max_attempts: u32,
    base_backoff: Duration,
    page_pacing: Duration,
    max_holders: Option<usize>,
}

impl<F: PageFetcher> HolderRetriever<F> {
    pub fn new(fetcher: F, page_size: u64, max_holders: Option<usize>) -> Self {
        Self {
            fetcher,
            page_size,
            max_attempts: MAX_PAGE_ATTEMPTS,
            base_backoff: Duration::from_millis(PAGE_BACKOFF_BASE_MS),
            page_pacing: Duration::from_millis(PAGE_PACING_MS),
            max_holders,
        }
    }

    /// Fetch every holder with balance >= threshold, in API order.
    ///
    /// The only termination condition is a page without next_offset; an API
    /// that never stops returning cursors loops forever unless the optional
    /// max_holders valve is configured. Fails with RETRIEVAL_FAILED once any
    /// single page exhausts its retry budget; no partial result is returned.
    pub async fn fetch_all(&self, threshold: U256) -> AppResult<Vec<HolderRecord>> {
        let mut holders: Vec<HolderRecord> = Vec::new();
        let mut offset: Option<u64> = None;
        let mut pages = 0u64;

        loop {
            let page = self.fetch_page_with_retry(offset).await?;
            pages += 1;
            debug!("📄 Page {}: {} raw entries", pages, page.items.len());

            for raw in &page.items {
                let balance = U256::from_str_radix(raw.balance.trim(), 10).map_err(|e| {
                    AppError::with_source(
                        ErrorCode::HolderApiInvalidResponse,
                        format!("Invalid balance string '{}'", raw.balance),
                        e,
                    )
                })?;
                if balance >= threshold {
                    let address = Address::from_str(&raw.address).map_err(|e| {
                        AppError::with_source(
                            ErrorCode::HolderApiInvalidResponse,
                            format!("Invalid holder address '{}'", raw.address),
                            e,
                        )
                    })?;
                    holders.push(HolderRecord { address, balance });
                }
            }

            if let Some(cap) = self.max_holders {
                if holders.len() >= cap {
                    warn!(
                        "⚠️ MAX_HOLDERS cap of {} reached after {} pages, stopping early",
                        cap, pages
                    );
                    holders.truncate(cap);
                    break;
                }
            }

            match page.next_offset {
                Some(next) => {
                    offset = Some(next);
                    // Sustained-rate pacing between pages, separate from retry backoff
                    tokio::time::sleep(self.page_pacing).await;
                }
                None => break,
            }
        }

        info!(
            "📊 Retrieved {} qualifying holders across {} pages",
            holders.len(),
            pages
        );
        Ok(holders)
    }

    /// One page request under the retry budget. The attempt counter is
    /// incremented before the delay is computed, so the first retry waits
    /// base * 2^1 (kept as the upstream provider docs describe it).
    async fn fetch_page_with_retry(&self, offset: Option<u64>) -> AppResult<HolderPage> {
        let mut attempt = 0u32;
        loop {
            match self.fetcher.fetch_page(self.page_size, offset).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(AppError::with_source(
                            ErrorCode::RetrievalFailed,
                            format!(
                                "Page request at offset {:?} failed after {} attempts",
                                offset, attempt
                            ),
                            e,
                        ));
                    }
                    let delay = self.base_backoff * 2u32.pow(attempt);
                    warn!(
                        "⏳ Page request failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.max_attempts - 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
