//! On-chain reads.
//!
//! Each operation wraps one read against a named contract and reports the
//! outcome as a [`Query`]. Nothing is cached or retried; callers compose
//! reads themselves.

use ethers::abi::Token;
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chain::contracts::{self, Outputs};
use crate::chain::{ChainClient, ChainError};
use crate::models::{DaoInfo, Proposal, ProposalContent, ProposalState, Query};

#[derive(Clone)]
pub struct QueryService {
    chain: Arc<dyn ChainClient>,
}

impl QueryService {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &Arc<dyn ChainClient> {
        &self.chain
    }

    pub async fn block_number(&self) -> Query<u64> {
        observe("blockNumber", self.chain.block_number().await)
    }

    /// Governor configuration; `None` address stays loading
    pub async fn dao_info(&self, governor: Option<Address>) -> Query<DaoInfo> {
        let Some(governor) = governor else {
            return Query::loading();
        };
        observe("daoInfo", self.fetch_dao_info(governor).await)
    }

    pub async fn proposal_id(&self, proposer: Option<Address>, index: U256) -> Query<U256> {
        let Some(proposer) = proposer else {
            return Query::loading();
        };
        let result = contracts::read(
            self.chain.as_ref(),
            proposer,
            contracts::proposer(),
            "getProposalID",
            &[Token::Uint(index)],
        )
        .await
        .and_then(|tokens| Outputs::new("getProposalID", tokens).uint("proposalId"));
        observe("proposalID", result)
    }

    pub async fn proposal_content(
        &self,
        proposer: Option<Address>,
        proposal_id: Option<U256>,
    ) -> Query<ProposalContent> {
        let (Some(proposer), Some(proposal_id)) = (proposer, proposal_id) else {
            return Query::loading();
        };
        let result = contracts::read(
            self.chain.as_ref(),
            proposer,
            contracts::proposer(),
            "getProposalContent",
            &[Token::Uint(proposal_id)],
        )
        .await
        .and_then(contracts::decode_proposal_content);
        observe("proposalContent", result)
    }

    pub async fn proposal_state(
        &self,
        governor: Option<Address>,
        proposal_id: Option<U256>,
    ) -> Query<ProposalState> {
        let (Some(governor), Some(proposal_id)) = (governor, proposal_id) else {
            return Query::loading();
        };
        let result = contracts::read(
            self.chain.as_ref(),
            governor,
            contracts::governor(),
            "state",
            &[Token::Uint(proposal_id)],
        )
        .await
        .and_then(contracts::decode_proposal_state);
        observe("proposalState", result)
    }

    pub async fn proposal(
        &self,
        governor: Option<Address>,
        proposal_id: Option<U256>,
    ) -> Query<Proposal> {
        let (Some(governor), Some(proposal_id)) = (governor, proposal_id) else {
            return Query::loading();
        };
        let result = contracts::read(
            self.chain.as_ref(),
            governor,
            contracts::governor(),
            "proposals",
            &[Token::Uint(proposal_id)],
        )
        .await
        .and_then(contracts::decode_proposal);
        observe("proposal", result)
    }

    async fn fetch_dao_info(&self, governor: Address) -> Result<DaoInfo, ChainError> {
        let chain = self.chain.as_ref();
        let abi = contracts::governor();

        let (name, token, proposer, voting_delay, voting_period, quorum_numerator) = futures::try_join!(
            contracts::read(chain, governor, abi, "name", &[]),
            contracts::read(chain, governor, abi, "token", &[]),
            contracts::read(chain, governor, abi, "proposer", &[]),
            contracts::read(chain, governor, abi, "votingDelay", &[]),
            contracts::read(chain, governor, abi, "votingPeriod", &[]),
            contracts::read(chain, governor, abi, "quorumNumerator", &[]),
        )?;

        Ok(DaoInfo {
            address: governor,
            name: Outputs::new("name", name).string("name")?,
            token: Outputs::new("token", token).address("token")?,
            proposer: Outputs::new("proposer", proposer).address("proposer")?,
            voting_delay: Outputs::new("votingDelay", voting_delay).uint("votingDelay")?,
            voting_period: Outputs::new("votingPeriod", voting_period).uint("votingPeriod")?,
            quorum_numerator: Outputs::new("quorumNumerator", quorum_numerator)
                .uint("quorumNumerator")?,
        })
    }
}

fn observe<T>(query: &str, result: Result<T, ChainError>) -> Query<T> {
    match &result {
        Ok(_) => debug!(query = query, "Query resolved"),
        Err(e) => warn!(query = query, error = %e, "Query failed"),
    }
    Query::from_result(result)
}
