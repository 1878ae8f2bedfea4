//! Chain access layer.
//!
//! [`ChainClient`] is the seam between the services and the node: the
//! JSON-RPC implementation lives in [`rpc`], tests substitute an in-memory
//! chain.

pub mod contracts;
pub mod rpc;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rpc::{ConfirmationConfig, NetworkConfig, RpcClient};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Node unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("ABI error: {0}")]
    Abi(#[from] ethers::abi::Error),
    #[error("Transaction {0:?} not confirmed after {1} attempts")]
    ConfirmationTimeout(H256, u32),
    #[error("No account available to send transactions")]
    NoSender,
}

impl ChainError {
    /// The node could not be reached or did not answer, as opposed to a
    /// request it answered with an error
    pub fn is_transport(&self) -> bool {
        matches!(self, ChainError::Network(_) | ChainError::Unavailable(_))
    }
}

/// Receipt fields the services care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: H256,
    pub contract_address: Option<Address>,
    pub success: bool,
    pub block_number: Option<u64>,
}

impl From<TransactionReceipt> for TxReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            // pre-byzantium receipts carry no status
            success: receipt.status.map(|s| s.as_u64() == 1).unwrap_or(true),
            block_number: receipt.block_number.map(|n| n.as_u64()),
        }
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;

    /// Accounts managed by the node
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<H256, ChainError>;

    /// Block until the transaction is mined
    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<TxReceipt, ChainError>;
}

/// Resolve the sending account: the configured one, else the node's first
pub async fn resolve_sender(
    chain: &dyn ChainClient,
    configured: Option<Address>,
) -> Result<Address, ChainError> {
    if let Some(sender) = configured {
        return Ok(sender);
    }
    chain
        .accounts()
        .await?
        .into_iter()
        .next()
        .ok_or(ChainError::NoSender)
}
