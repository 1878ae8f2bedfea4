use actix_web::{web, HttpResponse, Result};
use ethers::types::{Address, U256};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{parse_address, AppState};
use crate::api_error::ApiError;
use crate::models::VoteSupport;
use crate::service::parse_proposal_index;

#[derive(Debug, Deserialize, Validate)]
pub struct TransferProposalRequest {
    pub token: Address,
    pub recipient: Address,
    /// Base units as a decimal string
    #[validate(length(min = 1, max = 78))]
    pub amount: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub support: VoteSupport,
}

/// GET /api/proposal/:address/:index
/// Everything the proposal page renders, with a readiness flag
pub async fn get_proposal(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (address, index) = path.into_inner();
    let dao = parse_address(&address)?;
    let index = parse_proposal_index(&index);

    let page = state.proposals.load(dao, index).await;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/daos/:address/proposals/transfer
pub async fn propose_transfer(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<TransferProposalRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let governor = parse_address(&path.into_inner())?;
    let amount = U256::from_dec_str(req.amount.trim())
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a token amount", req.amount)))?;

    info!(dao = ?governor, "Received transfer proposal request");

    let outcome = state
        .governance
        .propose_transfer_tokens(governor, req.token, req.recipient, amount, &req.description)
        .await?;

    Ok(HttpResponse::Created().json(outcome))
}

/// POST /api/daos/:address/proposals/:id/vote
pub async fn cast_vote(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: web::Json<CastVoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let (address, id) = path.into_inner();
    let governor = parse_address(&address)?;
    let proposal_id = U256::from_dec_str(id.trim())
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a proposal id", id)))?;

    let outcome = state
        .governance
        .cast_vote(governor, proposal_id, req.support)
        .await?;

    Ok(HttpResponse::Ok().json(outcome))
}
