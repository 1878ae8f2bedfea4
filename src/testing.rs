//! Fixtures shared by unit tests: one DAO with one proposal on a mock chain

use ethers::abi::Token;
use ethers::types::{Address, U256};

use crate::chain::contracts;
use crate::chain::mock::MockChain;

pub fn governor_address() -> Address {
    Address::from_low_u64_be(0x600)
}

pub fn proposer_address() -> Address {
    Address::from_low_u64_be(0x700)
}

pub fn token_address() -> Address {
    Address::from_low_u64_be(0x800)
}

pub fn proposal_id() -> U256 {
    U256::from(0xdead_beef_u64)
}

/// Governor getters of the fixture DAO
pub fn mock_dao(chain: &MockChain) {
    let governor = governor_address();
    let abi = contracts::governor();

    chain.respond(governor, abi, "name", &[], &[Token::String("Grants DAO".to_string())]);
    chain.respond(governor, abi, "token", &[], &[Token::Address(token_address())]);
    chain.respond(governor, abi, "proposer", &[], &[Token::Address(proposer_address())]);
    chain.respond(governor, abi, "votingDelay", &[], &[Token::Uint(U256::from(1))]);
    chain.respond(governor, abi, "votingPeriod", &[], &[Token::Uint(U256::from(100))]);
    chain.respond(governor, abi, "quorumNumerator", &[], &[Token::Uint(U256::from(4))]);
}

/// Proposal at `index` voting between `start_block` and `end_block`
pub fn mock_proposal(chain: &MockChain, index: u64, start_block: u64, end_block: u64) {
    let id = proposal_id();

    chain.respond(
        proposer_address(),
        contracts::proposer(),
        "getProposalID",
        &[Token::Uint(U256::from(index))],
        &[Token::Uint(id)],
    );
    chain.respond(
        proposer_address(),
        contracts::proposer(),
        "getProposalContent",
        &[Token::Uint(id)],
        &[
            Token::Array(vec![Token::Address(token_address())]),
            Token::Array(vec![Token::Uint(U256::zero())]),
            Token::Array(vec![Token::Bytes(vec![0xa9, 0x05, 0x9c, 0xbb])]),
            Token::String("Send 10 NOTE to the grants multisig".to_string()),
        ],
    );
    chain.respond(
        governor_address(),
        contracts::governor(),
        "state",
        &[Token::Uint(id)],
        &[Token::Uint(U256::from(1))],
    );
    chain.respond(
        governor_address(),
        contracts::governor(),
        "proposals",
        &[Token::Uint(id)],
        &[
            Token::Uint(id),
            Token::Address(Address::from_low_u64_be(0xacc)),
            Token::Uint(U256::zero()),
            Token::Uint(U256::from(start_block)),
            Token::Uint(U256::from(end_block)),
            Token::Uint(U256::from(600)),
            Token::Uint(U256::from(300)),
            Token::Uint(U256::from(100)),
            Token::Bool(false),
            Token::Bool(false),
        ],
    );
}
