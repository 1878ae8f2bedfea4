use actix_web::{web, HttpResponse, Responder};
use tracing::info;

use super::{parse_address, AppState};
use crate::api_error::ApiError;

/// GET /api/network
/// Active network and its recorded addresses
pub async fn get_network(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.daos.network())
}

/// GET /api/daos
/// Every DAO in the address book with its info read
pub async fn list_daos(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.daos.list().await)
}

/// GET /api/daos/:address
pub async fn get_dao(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let address = parse_address(&path.into_inner())?;

    info!(dao = ?address, "Received DAO info request");

    Ok(HttpResponse::Ok().json(state.daos.info(address).await))
}
