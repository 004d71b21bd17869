//! External data providers
//!
//! - holders: paginated holder retrieval from the ledger-indexing API
//! - rpc: JSON-RPC node client for classification queries

pub mod holders;
pub mod rpc;

pub use holders::{HolderApiClient, HolderPage, HolderRetriever, PageFetcher, RawHolder};
pub use rpc::RpcProvider;
