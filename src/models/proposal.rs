use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Mirror of the governor's proposal states, in on-chain discriminant order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProposalState {
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
}

impl TryFrom<u8> for ProposalState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProposalState::Pending),
            1 => Ok(ProposalState::Active),
            2 => Ok(ProposalState::Canceled),
            3 => Ok(ProposalState::Defeated),
            4 => Ok(ProposalState::Succeeded),
            5 => Ok(ProposalState::Queued),
            6 => Ok(ProposalState::Expired),
            7 => Ok(ProposalState::Executed),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for ProposalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProposalState::Pending => "Pending",
            ProposalState::Active => "Active",
            ProposalState::Canceled => "Canceled",
            ProposalState::Defeated => "Defeated",
            ProposalState::Succeeded => "Succeeded",
            ProposalState::Queued => "Queued",
            ProposalState::Expired => "Expired",
            ProposalState::Executed => "Executed",
        };
        write!(f, "{}", label)
    }
}

/// Voting window position relative to the current block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteState {
    NotStarted,
    InProgress,
    Ended,
}

impl VoteState {
    /// `current < start` is NotStarted, `start <= current < end` is
    /// InProgress, `current >= end` is Ended.
    pub fn from_block_number(start_block: U256, end_block: U256, current_block: U256) -> Self {
        if current_block < start_block {
            VoteState::NotStarted
        } else if current_block < end_block {
            VoteState::InProgress
        } else {
            VoteState::Ended
        }
    }

    pub fn for_proposal(proposal: &Proposal, current_block: u64) -> Self {
        Self::from_block_number(
            proposal.start_block,
            proposal.end_block,
            U256::from(current_block),
        )
    }
}

/// Governor proposal record as returned by `proposals(uint256)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: U256,
    pub proposer: Address,
    pub eta: U256,
    pub start_block: U256,
    pub end_block: U256,
    pub for_votes: U256,
    pub against_votes: U256,
    pub abstain_votes: U256,
    pub canceled: bool,
    pub executed: bool,
}

impl Proposal {
    pub fn total_votes(&self) -> U256 {
        self.for_votes
            .saturating_add(self.against_votes)
            .saturating_add(self.abstain_votes)
    }
}

/// Actions and description submitted with a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalContent {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
    pub description: String,
}

/// Ballot choice, encoded as the governor's `support` byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl VoteSupport {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote_state(start: u64, end: u64, current: u64) -> VoteState {
        VoteState::from_block_number(U256::from(start), U256::from(end), U256::from(current))
    }

    #[test]
    fn test_vote_state_before_start() {
        assert_eq!(vote_state(100, 200, 0), VoteState::NotStarted);
        assert_eq!(vote_state(100, 200, 99), VoteState::NotStarted);
    }

    #[test]
    fn test_vote_state_start_boundary_is_in_progress() {
        assert_eq!(vote_state(100, 200, 100), VoteState::InProgress);
        assert_eq!(vote_state(100, 200, 199), VoteState::InProgress);
    }

    #[test]
    fn test_vote_state_end_boundary_is_ended() {
        assert_eq!(vote_state(100, 200, 200), VoteState::Ended);
        assert_eq!(vote_state(100, 200, 10_000), VoteState::Ended);
    }

    #[test]
    fn test_vote_state_empty_window() {
        // start == end never has an open window
        assert_eq!(vote_state(50, 50, 49), VoteState::NotStarted);
        assert_eq!(vote_state(50, 50, 50), VoteState::Ended);
    }

    #[test]
    fn test_proposal_state_from_discriminant() {
        assert_eq!(ProposalState::try_from(0), Ok(ProposalState::Pending));
        assert_eq!(ProposalState::try_from(1), Ok(ProposalState::Active));
        assert_eq!(ProposalState::try_from(5), Ok(ProposalState::Queued));
        assert_eq!(ProposalState::try_from(7), Ok(ProposalState::Executed));
        assert_eq!(ProposalState::try_from(8), Err(8));
    }

    #[test]
    fn test_vote_state_serialization() {
        assert_eq!(
            serde_json::to_string(&VoteState::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&VoteState::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
    }

    #[test]
    fn test_vote_support_encoding() {
        assert_eq!(VoteSupport::Against.as_u8(), 0);
        assert_eq!(VoteSupport::For.as_u8(), 1);
        assert_eq!(VoteSupport::Abstain.as_u8(), 2);

        let parsed: VoteSupport = serde_json::from_str("\"abstain\"").unwrap();
        assert_eq!(parsed, VoteSupport::Abstain);
    }

    #[test]
    fn test_total_votes() {
        let proposal = Proposal {
            id: U256::one(),
            proposer: Address::zero(),
            eta: U256::zero(),
            start_block: U256::from(10),
            end_block: U256::from(20),
            for_votes: U256::from(3),
            against_votes: U256::from(4),
            abstain_votes: U256::from(5),
            canceled: false,
            executed: false,
        };
        assert_eq!(proposal.total_votes(), U256::from(12));
        assert_eq!(VoteState::for_proposal(&proposal, 15), VoteState::InProgress);
    }
}
