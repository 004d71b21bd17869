//! Report assembly and JSON export
//!
//! The report is the terminal artifact of a run: one entry per qualifying
//! holder, in retrieval order, written as a single complete document only
//! after both stages finished for every holder. Never streamed, never
//! partial.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::config::ScanConfig;
use crate::models::errors::AppResult;
use crate::models::types::Classification;

/// One qualifying holder in the final report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub address: Address,
    /// Human-readable balance (decimal string, exact)
    pub balance: String,
    pub classification: Classification,
}

/// Per-classification counts, for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationTally {
    pub eoa: usize,
    pub multisig: usize,
    pub contract: usize,
}

/// Complete scan report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderReport {
    pub token_address: Address,
    pub chain_id: u64,
    pub token_decimals: u8,
    /// Threshold as entered by the operator
    pub min_balance: String,
    pub generated_at: DateTime<Utc>,
    pub holder_count: usize,
    /// Entries in retrieval order (the API's own ordering, not re-sorted)
    pub entries: Vec<ReportEntry>,
}

impl HolderReport {
    pub fn new(config: &ScanConfig, token_decimals: u8, entries: Vec<ReportEntry>) -> Self {
        Self {
            token_address: config.token_address,
            chain_id: config.chain_id,
            token_decimals,
            min_balance: config.min_balance.clone(),
            generated_at: Utc::now(),
            holder_count: entries.len(),
            entries,
        }
    }

    /// Count entries per classification
    pub fn tally(&self) -> ClassificationTally {
        let mut tally = ClassificationTally::default();
        for entry in &self.entries {
            match entry.classification {
                Classification::Eoa => tally.eoa += 1,
                Classification::MultisigWallet { .. } => tally.multisig += 1,
                Classification::Contract => tally.contract += 1,
            }
        }
        tally
    }

    /// Write the report as one pretty-printed JSON document
    pub fn write_json(&self, path: &Path) -> AppResult<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(path.to_path_buf())
    }
}
