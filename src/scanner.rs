//! Scan orchestration
//!
//! Strictly sequential pipeline:
//! 1. decimals() lookup, threshold conversion to base units
//! 2. full paginated retrieval (completes before any classification)
//! 3. per-address classification in retrieval order, with pacing
//! 4. report assembly
//!
//! Configuration and retrieval errors abort the run; classification
//! anomalies never do.

use std::time::Duration;
use tracing::{debug, info};

use crate::classifier::AddressClassifier;
use crate::models::config::ScanConfig;
use crate::models::errors::AppResult;
use crate::providers::holders::{HolderApiClient, HolderRetriever};
use crate::providers::rpc::RpcProvider;
use crate::report::{HolderReport, ReportEntry};
use crate::utils::constants::{get_chain_name, CLASSIFY_PACING_MS};
use crate::utils::units::{to_base_units, to_display_units};

/// Runs the retrieve-then-classify pipeline for one token
pub struct HolderScanner<'a> {
    config: &'a ScanConfig,
    rpc: RpcProvider,
}

impl<'a> HolderScanner<'a> {
    pub fn new(config: &'a ScanConfig) -> AppResult<Self> {
        let rpc = RpcProvider::new(&config.rpc_url)?;
        Ok(Self { config, rpc })
    }

    /// Execute a full scan and return the assembled report.
    /// Nothing is written to disk here; the caller persists the report.
    pub async fn run(&self) -> AppResult<HolderReport> {
        let config = self.config;
        info!(
            "🔍 Scanning holders of {} on {} ({})",
            config.token_address,
            get_chain_name(config.chain_id),
            config.chain_id
        );

        let decimals = self.rpc.token_decimals(config.token_address).await?;
        let threshold = to_base_units(&config.min_balance, decimals)?;
        info!(
            "🎯 Threshold: {} tokens = {} base units ({} decimals)",
            config.min_balance, threshold, decimals
        );

        let fetcher = HolderApiClient::new(config)?;
        let retriever = HolderRetriever::new(fetcher, config.page_size, config.max_holders);
        let holders = retriever.fetch_all(threshold).await?;

        let classifier = AddressClassifier::new(&self.rpc);
        let mut entries = Vec::with_capacity(holders.len());
        for (i, holder) in holders.iter().enumerate() {
            if i > 0 {
                // Shared-node pacing between per-address query pairs
                tokio::time::sleep(Duration::from_millis(CLASSIFY_PACING_MS)).await;
            }
            let classification = classifier.classify(holder.address).await?;
            debug!("🏷️ {} => {}", holder.address, classification.label());
            entries.push(ReportEntry {
                address: holder.address,
                balance: to_display_units(holder.balance, decimals),
                classification,
            });
        }

        let report = HolderReport::new(config, decimals, entries);
        let tally = report.tally();
        info!(
            "✅ Scan complete: {} holders ({} EOA, {} multisig, {} contract)",
            report.holder_count, tally.eoa, tally.multisig, tally.contract
        );
        Ok(report)
    }
}
