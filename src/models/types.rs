//! Core data types shared across the scanner

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A single token holder that met the balance threshold.
/// Immutable once produced by the retriever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderRecord {
    pub address: Address,
    /// Balance in the token's smallest unit (exact integer)
    pub balance: U256,
}

/// On-chain classification of a holder address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Externally-owned account: no deployed code
    Eoa,
    /// Contract exposing the Safe owner-enumeration interface
    MultisigWallet { owner_count: usize },
    /// Contract without a recognizable multisig interface
    Contract,
}

impl Classification {
    /// Stable label for logs and report summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eoa => "eoa",
            Self::MultisigWallet { .. } => "multisig_wallet",
            Self::Contract => "contract",
        }
    }
}
