//! Contract deployment capability
//!
//! [`ContractDeployer`] is what the orchestrator drives: construct a contract
//! by name, deploy it, wait for the confirmation, and later read back the size
//! of the deployed code. [`RpcDeployer`] does this against a node that signs
//! for its own accounts (Hardhat, Anvil, a dev node).

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, TransactionRequest, H256};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::chain::{resolve_sender, ChainClient, ChainError};

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Deployment of {contract} reverted in transaction {tx_hash:?}")]
    Reverted { contract: String, tx_hash: H256 },

    #[error("Receipt for {contract} carries no contract address (tx {tx_hash:?})")]
    MissingContractAddress { contract: String, tx_hash: H256 },

    #[error("Step '{step}' references '{reference}', which is not deployed before it")]
    UnresolvedReference { step: String, reference: String },

    #[error("Duplicate step name '{0}'")]
    DuplicateStep(String),
}

#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Account paying for and owning the deployments
    fn signer(&self) -> Address;

    /// Deploy `contract` with constructor `args` and wait for confirmation
    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address, DeployError>;

    /// Byte length of the code stored at `address`
    async fn bytecode_size(&self, address: Address) -> Result<usize, DeployError>;
}

pub struct RpcDeployer {
    chain: Arc<dyn ChainClient>,
    artifacts: ArtifactStore,
    signer: Address,
}

impl RpcDeployer {
    pub fn new(chain: Arc<dyn ChainClient>, artifacts: ArtifactStore, signer: Address) -> Self {
        Self {
            chain,
            artifacts,
            signer,
        }
    }

    /// Use `signer` when given, else the node's first account
    pub async fn connect(
        chain: Arc<dyn ChainClient>,
        artifacts: ArtifactStore,
        signer: Option<Address>,
    ) -> Result<Self, DeployError> {
        let signer = resolve_sender(chain.as_ref(), signer).await?;
        info!(signer = ?signer, artifacts = %artifacts.root().display(), "Deployer connected");
        Ok(Self::new(chain, artifacts, signer))
    }
}

#[async_trait]
impl ContractDeployer for RpcDeployer {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn deploy(&self, contract: &str, args: Vec<Token>) -> Result<Address, DeployError> {
        let artifact = self.artifacts.load(contract)?;
        let data = artifact.deploy_data(&args)?;

        let tx = TransactionRequest::new().from(self.signer).data(data);
        let tx_hash = self.chain.send_transaction(tx).await?;
        let receipt = self.chain.wait_for_receipt(tx_hash).await?;

        if !receipt.success {
            error!(contract = contract, tx_hash = ?tx_hash, "Deployment reverted");
            return Err(DeployError::Reverted {
                contract: contract.to_string(),
                tx_hash,
            });
        }

        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingContractAddress {
                contract: contract.to_string(),
                tx_hash,
            })?;

        info!(contract = contract, address = ?address, "Contract deployed");
        Ok(address)
    }

    async fn bytecode_size(&self, address: Address) -> Result<usize, DeployError> {
        Ok(self.chain.code_at(address).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;

    const ARTIFACT: &str = r#"{
        "contractName": "DAOTokenDeployer",
        "abi": [
            {"type": "constructor", "inputs": [{"name": "turnstile", "type": "address"}]}
        ],
        "bytecode": "0x6001"
    }"#;

    fn artifacts() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DAOTokenDeployer.json"), ARTIFACT).unwrap();
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_connect_uses_first_node_account() {
        let (_dir, store) = artifacts();
        let deployer = RpcDeployer::connect(Arc::new(MockChain::new(1)), store, None)
            .await
            .unwrap();
        assert_eq!(deployer.signer(), Address::from_low_u64_be(0xacc));
    }

    #[tokio::test]
    async fn test_deploy_sends_creation_transaction() {
        let (_dir, store) = artifacts();
        let chain = Arc::new(MockChain::new(1));
        let signer = Address::from_low_u64_be(0xbeef);
        let deployer = RpcDeployer::new(chain.clone(), store, signer);

        let turnstile = Address::from_low_u64_be(0x77);
        let address = deployer
            .deploy("DAOTokenDeployer", vec![Token::Address(turnstile)])
            .await
            .unwrap();

        assert_eq!(address, Address::from_low_u64_be(0xc001));

        let sent = chain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, Some(signer));
        assert!(sent[0].to.is_none());

        let data = sent[0].data.clone().unwrap();
        assert_eq!(&data[..2], &[0x60, 0x01]);
        assert_eq!(&data[2 + 12..], turnstile.as_bytes());
    }

    #[tokio::test]
    async fn test_deploy_reverted() {
        let (_dir, store) = artifacts();
        let chain = Arc::new(MockChain::new(1).reverting());
        let deployer = RpcDeployer::new(chain, store, Address::from_low_u64_be(1));

        let err = deployer
            .deploy("DAOTokenDeployer", vec![Token::Address(Address::zero())])
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Reverted { .. }));
    }

    #[tokio::test]
    async fn test_bad_arguments_never_reach_the_chain() {
        let (_dir, store) = artifacts();
        let chain = Arc::new(MockChain::new(1));
        let deployer = RpcDeployer::new(chain.clone(), store, Address::from_low_u64_be(1));

        let err = deployer.deploy("DAOTokenDeployer", vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            DeployError::Artifact(ArtifactError::ArgumentCount { .. })
        ));
        assert!(chain.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bytecode_size() {
        let (_dir, store) = artifacts();
        let chain = Arc::new(MockChain::new(1));
        let target = Address::from_low_u64_be(42);
        chain.set_code(target, vec![0u8; 1234]);

        let deployer = RpcDeployer::new(chain, store, Address::from_low_u64_be(1));
        assert_eq!(deployer.bytecode_size(target).await.unwrap(), 1234);
        assert_eq!(deployer.bytecode_size(Address::zero()).await.unwrap(), 0);
    }
}
