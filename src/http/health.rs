use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::api_error::ApiError;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let block_number = state.queries.chain().block_number().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "chain": "ok",
        "blockNumber": block_number,
        "network": state.daos.network().network,
    })))
}
