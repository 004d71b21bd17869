//! Address Classifier
//!
//! Three-state decision tree, evaluated once per address, no retry:
//! 1. eth_getCode: empty bytecode means a plain account (EOA). Terminal.
//! 2. getOwners() probe against the Safe owner-enumeration interface:
//!    a decodable owner list means a multisig wallet. Terminal.
//! 3. Any probe failure (revert, wrong interface, decode error) means a
//!    generic contract. Terminal, and never an error: the probe outcome is
//!    an explicit Result inspected here, not an exception to swallow.
//!
//! Only the code-presence query can fail outward (unreachable node).

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Classification;
use crate::providers::rpc::RpcProvider;

sol! {
    /// Safe (ex Gnosis Safe) owner enumeration
    function getOwners() external view returns (address[] memory);
}

/// On-chain read access needed for classification. `RpcProvider` is the
/// production implementation; tests substitute scripted fakes.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Deployed bytecode at an address (empty for plain accounts)
    async fn get_code(&self, address: Address) -> AppResult<Vec<u8>>;
    /// eth_call returning raw return data
    async fn call(&self, to: Address, data: Vec<u8>) -> AppResult<Vec<u8>>;
}

#[async_trait]
impl ChainReader for RpcProvider {
    async fn get_code(&self, address: Address) -> AppResult<Vec<u8>> {
        RpcProvider::get_code(self, address).await
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> AppResult<Vec<u8>> {
        RpcProvider::eth_call(self, to, &data).await
    }
}

/// Classifies holder addresses as EOA, multisig wallet, or opaque contract
pub struct AddressClassifier<'a, R: ChainReader> {
    reader: &'a R,
}

impl<'a, R: ChainReader> AddressClassifier<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Classify a single address. Exactly one terminal classification per
    /// call; probe failures downgrade to Contract instead of propagating.
    pub async fn classify(&self, address: Address) -> AppResult<Classification> {
        let code = self.reader.get_code(address).await?;
        if code.is_empty() {
            return Ok(Classification::Eoa);
        }

        match self.probe_owners(address).await {
            Ok(owner_count) => Ok(Classification::MultisigWallet { owner_count }),
            Err(e) => {
                debug!(
                    "🔎 getOwners() probe failed for {} ({}), classifying as contract",
                    address, e
                );
                Ok(Classification::Contract)
            }
        }
    }

    /// The multisig probe. Returns the owner count, or an error when the
    /// call reverts or the return data does not decode as an address list.
    async fn probe_owners(&self, address: Address) -> AppResult<usize> {
        let calldata = getOwnersCall {}.abi_encode();
        let ret = self.reader.call(address, calldata).await?;
        let decoded = getOwnersCall::abi_decode_returns(&ret, true).map_err(|e| {
            AppError::with_source(
                ErrorCode::RpcInvalidResponse,
                "Return data is not an owner list",
                e,
            )
        })?;
        Ok(decoded._0.len())
    }
}
