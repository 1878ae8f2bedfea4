// Service layer
pub mod dao_service;
pub mod deploy_service;
pub mod deployer;
pub mod governance_tx_service;
pub mod proposal_page_service;
pub mod query_service;

pub use dao_service::{DaoService, NetworkView};
pub use deploy_service::{ConstructorArg, DeployService, DeployStep, DeploymentPlan, ReportStyle};
pub use deployer::{ContractDeployer, DeployError, RpcDeployer};
pub use governance_tx_service::{GovernanceTxError, GovernanceTxService, TxOutcome, TxStatus};
pub use proposal_page_service::{parse_proposal_index, ProposalPage, ProposalPageService};
pub use query_service::QueryService;
