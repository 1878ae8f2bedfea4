pub mod dao_handler;
pub mod health;
pub mod proposal_handler;

use actix_web::web;
use ethers::types::Address;
use std::sync::Arc;

use crate::address_book::AddressResolver;
use crate::api_error::ApiError;
use crate::chain::ChainClient;
use crate::service::{DaoService, GovernanceTxService, ProposalPageService, QueryService};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub queries: QueryService,
    pub daos: DaoService,
    pub proposals: ProposalPageService,
    pub governance: GovernanceTxService,
}

impl AppState {
    pub fn new(chain: Arc<dyn ChainClient>, resolver: AddressResolver, sender: Option<Address>) -> Self {
        let queries = QueryService::new(chain.clone());
        Self {
            daos: DaoService::new(queries.clone(), resolver),
            proposals: ProposalPageService::new(queries.clone()),
            governance: GovernanceTxService::new(chain, sender),
            queries,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/network", web::get().to(dao_handler::get_network))
            .route("/daos", web::get().to(dao_handler::list_daos))
            .route("/daos/{address}", web::get().to(dao_handler::get_dao))
            .route(
                "/daos/{address}/proposals/transfer",
                web::post().to(proposal_handler::propose_transfer),
            )
            .route(
                "/daos/{address}/proposals/{id}/vote",
                web::post().to(proposal_handler::cast_vote),
            )
            .route(
                "/proposal/{address}/{index}",
                web::get().to(proposal_handler::get_proposal),
            ),
    );
}

pub(crate) fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not an address", raw)))
}
