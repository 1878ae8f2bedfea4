//! Proposal page composition
//!
//! The page needs six reads, some depending on others:
//!
//! 1. block number and DAO info (independent)
//! 2. proposal id, from the DAO's proposer contract and the page index
//! 3. proposal content, proposal state and proposal record, keyed by the id
//!
//! Each stage is joined before the next starts. The page is ready only when
//! every read is ready; until then the vote state reads as not started.

use ethers::types::{Address, U256};
use serde::Serialize;
use tracing::info;

use super::query_service::QueryService;
use crate::models::{
    all_ready, DaoInfo, Proposal, ProposalContent, ProposalState, Query, QueryStatus, VoteState,
};

/// Which parts of the page have something to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSections {
    pub vote_dashboard: bool,
    pub results: bool,
    pub turnout_finished: bool,
}

impl ProposalSections {
    pub fn for_vote_state(vote_state: VoteState) -> Self {
        Self {
            vote_dashboard: vote_state == VoteState::InProgress,
            results: vote_state != VoteState::NotStarted,
            turnout_finished: vote_state == VoteState::Ended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryFailure {
    pub query: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPage {
    pub dao_address: Address,
    pub index: U256,
    pub ready: bool,
    pub vote_state: VoteState,
    pub sections: ProposalSections,
    pub block_number: Query<u64>,
    pub dao_info: Query<DaoInfo>,
    pub proposal_id: Query<U256>,
    pub proposal_content: Query<ProposalContent>,
    pub proposal_state: Query<ProposalState>,
    pub proposal: Query<Proposal>,
    pub errors: Vec<QueryFailure>,
}

/// Page index from the route, decimal or `0x` hex; anything else is 0
pub fn parse_proposal_index(raw: &str) -> U256 {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(raw).ok(),
    };
    parsed.unwrap_or_else(U256::zero)
}

#[derive(Clone)]
pub struct ProposalPageService {
    queries: QueryService,
}

impl ProposalPageService {
    pub fn new(queries: QueryService) -> Self {
        Self { queries }
    }

    pub async fn load(&self, dao_address: Address, index: U256) -> ProposalPage {
        let q = &self.queries;

        let (block_number, dao_info) = tokio::join!(q.block_number(), q.dao_info(Some(dao_address)));

        let proposer = dao_info.data().map(|info| info.proposer);
        let proposal_id = q.proposal_id(proposer, index).await;

        let id = proposal_id.data().copied();
        let (proposal_content, mut proposal_state, proposal) = tokio::join!(
            q.proposal_content(proposer, id),
            q.proposal_state(Some(dao_address), id),
            q.proposal(Some(dao_address), id),
        );

        // shown as pending until the state read lands; readiness still waits for it
        if proposal_state.data.is_none() {
            proposal_state.data = Some(ProposalState::Pending);
        }

        let ready = all_ready(&[
            &block_number,
            &dao_info,
            &proposal_id,
            &proposal_content,
            &proposal_state,
            &proposal,
        ]);

        let vote_state = match (ready, proposal.data(), block_number.data()) {
            (true, Some(proposal), Some(current)) => VoteState::for_proposal(proposal, *current),
            _ => VoteState::NotStarted,
        };

        let errors = collect_failures(&[
            ("blockNumber", &block_number),
            ("daoInfo", &dao_info),
            ("proposalID", &proposal_id),
            ("proposalContent", &proposal_content),
            ("proposalState", &proposal_state),
            ("proposal", &proposal),
        ]);

        info!(
            dao = ?dao_address,
            index = %index,
            ready = ready,
            vote_state = ?vote_state,
            failures = errors.len(),
            "Proposal page loaded"
        );

        ProposalPage {
            dao_address,
            index,
            ready,
            vote_state,
            sections: ProposalSections::for_vote_state(vote_state),
            block_number,
            dao_info,
            proposal_id,
            proposal_content,
            proposal_state,
            proposal,
            errors,
        }
    }
}

fn collect_failures(queries: &[(&'static str, &dyn QueryStatus)]) -> Vec<QueryFailure> {
    queries
        .iter()
        .filter_map(|(name, query)| {
            query.error().map(|message| QueryFailure {
                query: *name,
                message: message.to_string(),
            })
        })
        .collect()
}
