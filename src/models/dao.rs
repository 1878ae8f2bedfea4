use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use super::query::Query;

/// Governor configuration read from chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoInfo {
    pub address: Address,
    pub name: String,
    pub token: Address,
    pub proposer: Address,
    pub voting_delay: U256,
    pub voting_period: U256,
    pub quorum_numerator: U256,
}

/// Entry of the DAO listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoSummary {
    pub address: Address,
    pub info: Query<DaoInfo>,
}
