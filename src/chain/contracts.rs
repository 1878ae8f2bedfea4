//! ABIs of the governance contracts and helpers to call them.

use ethers::abi::{parse_abi, Abi, Token};
use ethers::types::{Address, Bytes, U256};
use once_cell::sync::Lazy;

use super::{ChainClient, ChainError};
use crate::models::{Proposal, ProposalContent, ProposalState};

static GOVERNOR_ABI: Lazy<Abi> = Lazy::new(|| {
    parse_abi(&[
        "function name() external view returns (string)",
        "function token() external view returns (address)",
        "function proposer() external view returns (address)",
        "function votingDelay() external view returns (uint256)",
        "function votingPeriod() external view returns (uint256)",
        "function quorumNumerator() external view returns (uint256)",
        "function state(uint256 proposalId) external view returns (uint8)",
        "function proposals(uint256 proposalId) external view returns (uint256 id, address proposer, uint256 eta, uint256 startBlock, uint256 endBlock, uint256 forVotes, uint256 againstVotes, uint256 abstainVotes, bool canceled, bool executed)",
        "function propose(address[] targets, uint256[] values, bytes[] calldatas, string description) external returns (uint256)",
        "function castVote(uint256 proposalId, uint8 support) external returns (uint256)",
    ])
    .expect("governor ABI signatures are well-formed")
});

static PROPOSER_ABI: Lazy<Abi> = Lazy::new(|| {
    parse_abi(&[
        "function getProposalID(uint256 index) external view returns (uint256)",
        "function getProposalContent(uint256 proposalId) external view returns (address[] targets, uint256[] values, bytes[] calldatas, string description)",
    ])
    .expect("proposer ABI signatures are well-formed")
});

static ERC20_ABI: Lazy<Abi> = Lazy::new(|| {
    parse_abi(&["function transfer(address to, uint256 amount) external returns (bool)"])
        .expect("ERC-20 ABI signatures are well-formed")
});

pub fn governor() -> &'static Abi {
    &GOVERNOR_ABI
}

pub fn proposer() -> &'static Abi {
    &PROPOSER_ABI
}

pub fn erc20() -> &'static Abi {
    &ERC20_ABI
}

/// ABI-encode a call to `abi.name(args)`
pub fn encode_call(abi: &Abi, name: &str, args: &[Token]) -> Result<Bytes, ChainError> {
    let function = abi.function(name)?;
    Ok(function.encode_input(args)?.into())
}

/// Run a read-only call and decode its outputs
pub async fn read(
    chain: &dyn ChainClient,
    to: Address,
    abi: &Abi,
    name: &str,
    args: &[Token],
) -> Result<Vec<Token>, ChainError> {
    let function = abi.function(name)?;
    let data = function.encode_input(args)?;
    let output = chain.call(to, data.into()).await?;
    Ok(function.decode_output(&output)?)
}

/// Sequential reader over decoded output tokens
pub struct Outputs {
    function: &'static str,
    tokens: std::vec::IntoIter<Token>,
}

impl Outputs {
    pub fn new(function: &'static str, tokens: Vec<Token>) -> Self {
        Self {
            function,
            tokens: tokens.into_iter(),
        }
    }

    fn next(&mut self, field: &str) -> Result<Token, ChainError> {
        self.tokens.next().ok_or_else(|| {
            ChainError::InvalidResponse(format!("{}: missing output '{}'", self.function, field))
        })
    }

    fn mismatch(&self, field: &str, expected: &str) -> ChainError {
        ChainError::InvalidResponse(format!(
            "{}: output '{}' is not {}",
            self.function, field, expected
        ))
    }

    pub fn uint(&mut self, field: &str) -> Result<U256, ChainError> {
        let token = self.next(field)?;
        token.into_uint().ok_or_else(|| self.mismatch(field, "a uint"))
    }

    pub fn address(&mut self, field: &str) -> Result<Address, ChainError> {
        let token = self.next(field)?;
        token
            .into_address()
            .ok_or_else(|| self.mismatch(field, "an address"))
    }

    pub fn string(&mut self, field: &str) -> Result<String, ChainError> {
        let token = self.next(field)?;
        token
            .into_string()
            .ok_or_else(|| self.mismatch(field, "a string"))
    }

    pub fn boolean(&mut self, field: &str) -> Result<bool, ChainError> {
        let token = self.next(field)?;
        token.into_bool().ok_or_else(|| self.mismatch(field, "a bool"))
    }

    pub fn array(&mut self, field: &str) -> Result<Vec<Token>, ChainError> {
        let token = self.next(field)?;
        token
            .into_array()
            .ok_or_else(|| self.mismatch(field, "an array"))
    }
}

pub fn decode_proposal_state(tokens: Vec<Token>) -> Result<ProposalState, ChainError> {
    let raw = Outputs::new("state", tokens).uint("state")?;
    if raw > U256::from(u8::MAX) {
        return Err(ChainError::InvalidResponse(format!(
            "state: {} is not a proposal state",
            raw
        )));
    }
    ProposalState::try_from(raw.as_u32() as u8).map_err(|value| {
        ChainError::InvalidResponse(format!("state: {} is not a proposal state", value))
    })
}

pub fn decode_proposal(tokens: Vec<Token>) -> Result<Proposal, ChainError> {
    let mut out = Outputs::new("proposals", tokens);
    Ok(Proposal {
        id: out.uint("id")?,
        proposer: out.address("proposer")?,
        eta: out.uint("eta")?,
        start_block: out.uint("startBlock")?,
        end_block: out.uint("endBlock")?,
        for_votes: out.uint("forVotes")?,
        against_votes: out.uint("againstVotes")?,
        abstain_votes: out.uint("abstainVotes")?,
        canceled: out.boolean("canceled")?,
        executed: out.boolean("executed")?,
    })
}

pub fn decode_proposal_content(tokens: Vec<Token>) -> Result<ProposalContent, ChainError> {
    let mut out = Outputs::new("getProposalContent", tokens);
    let mismatch = |field: &str| {
        ChainError::InvalidResponse(format!("getProposalContent: malformed '{}'", field))
    };

    let targets = out
        .array("targets")?
        .into_iter()
        .map(|t| t.into_address().ok_or_else(|| mismatch("targets")))
        .collect::<Result<Vec<_>, _>>()?;
    let values = out
        .array("values")?
        .into_iter()
        .map(|t| t.into_uint().ok_or_else(|| mismatch("values")))
        .collect::<Result<Vec<_>, _>>()?;
    let calldatas = out
        .array("calldatas")?
        .into_iter()
        .map(|t| t.into_bytes().map(Bytes::from).ok_or_else(|| mismatch("calldatas")))
        .collect::<Result<Vec<_>, _>>()?;
    let description = out.string("description")?;

    Ok(ProposalContent {
        targets,
        values,
        calldatas,
        description,
    })
}
