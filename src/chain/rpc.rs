//! Ethereum JSON-RPC client
//!
//! Thin transport over `reqwest` covering the handful of methods the
//! deployer and the query layer need:
//! - `eth_blockNumber`, `eth_call`, `eth_getCode` for reads
//! - `eth_accounts`, `eth_sendTransaction` for node-signed transactions
//! - `eth_getTransactionReceipt`, polled with exponential backoff

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TransactionRequest, H256, U64};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ChainClient, ChainError, TxReceipt};

/// Node endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// RPC endpoint URL (e.g., "http://127.0.0.1:8545")
    pub rpc_url: String,
}

impl NetworkConfig {
    /// Local Hardhat node
    pub fn localhost() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
        }
    }

    pub fn custom(rpc_url: String) -> Self {
        Self { rpc_url }
    }
}

/// Receipt polling schedule
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
            backoff_multiplier: 1.5,
        }
    }
}

impl ConfirmationConfig {
    /// Delay before poll number `attempt + 1`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let mut delay = self.initial_delay_ms as f64;
        for _ in 0..attempt {
            delay *= self.backoff_multiplier;
            if delay >= self.max_delay_ms as f64 {
                break;
            }
        }
        Duration::from_millis((delay as u64).min(self.max_delay_ms))
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // data is kept for Debug output
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// JSON-RPC client
#[derive(Clone)]
pub struct RpcClient {
    network: NetworkConfig,
    client: reqwest::Client,
    confirmation: ConfirmationConfig,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(network: NetworkConfig) -> Self {
        Self::with_confirmation_config(network, ConfirmationConfig::default())
    }

    pub fn with_confirmation_config(network: NetworkConfig, confirmation: ConfirmationConfig) -> Self {
        Self {
            network,
            client: reqwest::Client::new(),
            confirmation,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> Result<Option<TransactionReceipt>, ChainError> {
        self.rpc_call("eth_getTransactionReceipt", serde_json::json!([tx_hash]))
            .await
    }

    /// Make a call to the JSON-RPC endpoint
    async fn rpc_call<T>(&self, method: &str, params: serde_json::Value) -> Result<T, ChainError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method = method, id = request.id, "Sending RPC request");

        let response = self
            .client
            .post(&self.network.rpc_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ChainError::Unavailable(format!("HTTP {}: {}", status, text)));
        }

        parse_rpc_response(&text)
    }
}

fn parse_rpc_response<T>(text: &str) -> Result<T, ChainError>
where
    T: for<'de> Deserialize<'de>,
{
    let response: RpcResponse = serde_json::from_str(text)?;

    if let Some(error) = response.error {
        return Err(ChainError::Rpc(format!(
            "RPC error {}: {}",
            error.code, error.message
        )));
    }

    let result = response.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(ChainError::Serialization)
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        let number: U64 = self
            .rpc_call("eth_blockNumber", serde_json::json!([]))
            .await?;
        Ok(number.as_u64())
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let call = serde_json::json!({ "to": to, "data": data });
        self.rpc_call("eth_call", serde_json::json!([call, "latest"]))
            .await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError> {
        self.rpc_call("eth_getCode", serde_json::json!([address, "latest"]))
            .await
    }

    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        self.rpc_call("eth_accounts", serde_json::json!([])).await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<H256, ChainError> {
        let hash: H256 = self
            .rpc_call("eth_sendTransaction", serde_json::json!([tx]))
            .await?;
        info!(tx_hash = ?hash, "Transaction submitted");
        Ok(hash)
    }

    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<TxReceipt, ChainError> {
        let mut attempt = 0;

        loop {
            match self.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    let receipt = TxReceipt::from(receipt);
                    info!(
                        tx_hash = ?tx_hash,
                        block = ?receipt.block_number,
                        success = receipt.success,
                        "Transaction mined"
                    );
                    return Ok(receipt);
                }
                Ok(None) => {
                    // not mined yet
                }
                Err(e) => {
                    warn!(
                        tx_hash = ?tx_hash,
                        attempt = attempt,
                        error = %e,
                        "Error fetching transaction receipt"
                    );
                }
            }

            if attempt >= self.confirmation.max_attempts {
                return Err(ChainError::ConfirmationTimeout(
                    tx_hash,
                    self.confirmation.max_attempts,
                ));
            }

            let delay = self.confirmation.delay_for(attempt);
            attempt += 1;
            debug!(
                tx_hash = ?tx_hash,
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                "Waiting for receipt"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
