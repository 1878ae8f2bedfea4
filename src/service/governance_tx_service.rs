//! Governance transactions sent from a node-managed account

use ethers::abi::Token;
use ethers::types::{Address, Bytes, TransactionRequest, H256, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::chain::contracts;
use crate::chain::{resolve_sender, ChainClient, ChainError, TxReceipt};
use crate::models::{VoteState, VoteSupport};

#[derive(Debug, Error)]
pub enum GovernanceTxError {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Voting is not open for proposal {proposal_id} ({vote_state:?})")]
    VotingClosed {
        proposal_id: U256,
        vote_state: VoteState,
    },

    #[error("Proposal {0} could not be read: {1}")]
    ProposalUnavailable(U256, String),
}

/// Transaction result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: H256,
    pub status: TxStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl From<TxReceipt> for TxOutcome {
    fn from(receipt: TxReceipt) -> Self {
        Self {
            tx_hash: receipt.tx_hash,
            status: if receipt.success {
                TxStatus::Success
            } else {
                TxStatus::Failed
            },
            block_number: receipt.block_number,
        }
    }
}

#[derive(Clone)]
pub struct GovernanceTxService {
    chain: Arc<dyn ChainClient>,
    sender: Option<Address>,
}

impl GovernanceTxService {
    pub fn new(chain: Arc<dyn ChainClient>, sender: Option<Address>) -> Self {
        Self { chain, sender }
    }

    /// Propose an ERC-20 transfer out of the DAO treasury
    pub async fn propose_transfer_tokens(
        &self,
        governor: Address,
        token: Address,
        recipient: Address,
        amount: U256,
        description: &str,
    ) -> Result<TxOutcome, GovernanceTxError> {
        info!(
            governor = ?governor,
            token = ?token,
            recipient = ?recipient,
            amount = %amount,
            "Proposing token transfer"
        );

        let calldata = transfer_calldata(recipient, amount)?;
        let data = contracts::encode_call(
            contracts::governor(),
            "propose",
            &[
                Token::Array(vec![Token::Address(token)]),
                Token::Array(vec![Token::Uint(U256::zero())]),
                Token::Array(vec![Token::Bytes(calldata.to_vec())]),
                Token::String(description.to_string()),
            ],
        )?;

        self.send(governor, data).await
    }

    /// Vote on a proposal whose voting window is open
    pub async fn cast_vote(
        &self,
        governor: Address,
        proposal_id: U256,
        support: VoteSupport,
    ) -> Result<TxOutcome, GovernanceTxError> {
        let proposal_args = [Token::Uint(proposal_id)];
        let (block_number, proposal) = tokio::join!(
            self.chain.block_number(),
            contracts::read(
                self.chain.as_ref(),
                governor,
                contracts::governor(),
                "proposals",
                &proposal_args,
            ),
        );

        let current = block_number?;
        let proposal = proposal
            .and_then(contracts::decode_proposal)
            .map_err(|e| {
                if e.is_transport() {
                    GovernanceTxError::Chain(e)
                } else {
                    GovernanceTxError::ProposalUnavailable(proposal_id, e.to_string())
                }
            })?;

        let vote_state = VoteState::for_proposal(&proposal, current);
        if vote_state != VoteState::InProgress {
            warn!(proposal_id = %proposal_id, vote_state = ?vote_state, "Vote rejected");
            return Err(GovernanceTxError::VotingClosed {
                proposal_id,
                vote_state,
            });
        }

        info!(governor = ?governor, proposal_id = %proposal_id, support = ?support, "Casting vote");

        let data = contracts::encode_call(
            contracts::governor(),
            "castVote",
            &[
                Token::Uint(proposal_id),
                Token::Uint(U256::from(support.as_u8())),
            ],
        )?;

        self.send(governor, data).await
    }

    async fn send(&self, to: Address, data: Bytes) -> Result<TxOutcome, GovernanceTxError> {
        let from = resolve_sender(self.chain.as_ref(), self.sender).await?;
        let tx = TransactionRequest::new().from(from).to(to).data(data);

        let tx_hash = self.chain.send_transaction(tx).await?;
        let receipt = self.chain.wait_for_receipt(tx_hash).await?;
        let outcome = TxOutcome::from(receipt);

        if outcome.status == TxStatus::Failed {
            warn!(tx_hash = ?tx_hash, "Governance transaction reverted");
        }
        Ok(outcome)
    }
}

/// ERC-20 `transfer(recipient, amount)` calldata
pub fn transfer_calldata(recipient: Address, amount: U256) -> Result<Bytes, ChainError> {
    contracts::encode_call(
        contracts::erc20(),
        "transfer",
        &[Token::Address(recipient), Token::Uint(amount)],
    )
}
