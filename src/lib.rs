//! HolderScan Library
//!
//! Token whale-holder scanner:
//! - Paginated holder retrieval from a rate-limited ledger-indexing API
//!   with retry/backoff and exact-integer threshold filtering
//! - On-chain address classification (EOA / multisig wallet / contract)
//!   via eth_getCode and a Safe getOwners() probe
//! - Consolidated JSON report, written only after a fully successful run

pub mod classifier;
pub mod models;
pub mod providers;
pub mod report;
pub mod scanner;
pub mod utils;

pub use classifier::{AddressClassifier, ChainReader};
pub use models::config::ScanConfig;
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{Classification, HolderRecord};
pub use providers::holders::{HolderApiClient, HolderPage, HolderRetriever, PageFetcher, RawHolder};
pub use providers::rpc::RpcProvider;
pub use report::{ClassificationTally, HolderReport, ReportEntry};
pub use scanner::HolderScanner;
