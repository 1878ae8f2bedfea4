//! Deployment orchestration
//!
//! A [`DeploymentPlan`] is a fixed sequence of contract constructions. Steps
//! run strictly in order; a step may take the address of any earlier step as a
//! constructor argument. The first failure aborts the run; contracts already
//! deployed stay on chain.

use chrono::Utc;
use ethers::abi::Token;
use ethers::types::{Address, U256};
use std::collections::HashMap;
use tracing::info;

use super::deployer::{ContractDeployer, DeployError};
use crate::models::{DeploymentRecord, DeploymentSummary};

/// Whole tokens minted to the deployer by the note plan
pub const NOTE_INITIAL_SUPPLY: u64 = 100_000;
pub const NOTE_DECIMALS: usize = 18;

/// How a finished run is printed as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// `name | address | bytecode size` table
    Table,
    /// One `<name> deployed to: <address>` line per step
    DeployedTo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstructorArg {
    /// Address produced by an earlier step
    Deployed(String),
    /// Address of the deploying account
    Signer,
    Literal(Token),
}

impl ConstructorArg {
    pub fn deployed(step: &str) -> Self {
        ConstructorArg::Deployed(step.to_string())
    }

    pub fn string(value: &str) -> Self {
        ConstructorArg::Literal(Token::String(value.to_string()))
    }

    pub fn uint(value: U256) -> Self {
        ConstructorArg::Literal(Token::Uint(value))
    }

    pub fn address(value: Address) -> Self {
        ConstructorArg::Literal(Token::Address(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployStep {
    pub name: String,
    pub contract: String,
    pub args: Vec<ConstructorArg>,
    /// Listed in the summary; unlisted steps are only dependencies
    pub reported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
    pub name: String,
    pub steps: Vec<DeployStep>,
    pub report: ReportStyle,
}

impl DeploymentPlan {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
            report: ReportStyle::Table,
        }
    }

    pub fn step(self, name: &str, contract: &str, args: Vec<ConstructorArg>) -> Self {
        self.push_step(name, contract, args, true)
    }

    /// A step deployed for later steps to reference but left out of the summary
    pub fn internal_step(self, name: &str, contract: &str, args: Vec<ConstructorArg>) -> Self {
        self.push_step(name, contract, args, false)
    }

    pub fn report(mut self, report: ReportStyle) -> Self {
        self.report = report;
        self
    }

    fn push_step(
        mut self,
        name: &str,
        contract: &str,
        args: Vec<ConstructorArg>,
        reported: bool,
    ) -> Self {
        self.steps.push(DeployStep {
            name: name.to_string(),
            contract: contract.to_string(),
            args,
            reported,
        });
        self
    }

    /// DAO factory and the deployers it clones governance contracts from
    pub fn factory() -> Self {
        Self::new("factory")
            .step("daoGovernorDeployer", "DAOGovernorDeployer", vec![])
            .internal_step("turnstile", "Turnstile", vec![])
            .step(
                "daoTokenDeployer",
                "DAOTokenDeployer",
                vec![ConstructorArg::deployed("turnstile")],
            )
            .step("daoProposerDeployer", "DAOProposerDeployer", vec![])
            .step(
                "daoFactory",
                "DAOFactory",
                vec![
                    ConstructorArg::deployed("daoGovernorDeployer"),
                    ConstructorArg::deployed("daoTokenDeployer"),
                    ConstructorArg::deployed("daoProposerDeployer"),
                    ConstructorArg::deployed("turnstile"),
                ],
            )
    }

    /// Note governance token, full supply minted to the deployer
    pub fn note() -> Self {
        Self::new("note")
            .step(
                "Note",
                "DAOToken",
                vec![
                    ConstructorArg::string("Note"),
                    ConstructorArg::string("NOTE"),
                    ConstructorArg::Signer,
                    ConstructorArg::uint(note_initial_supply()),
                ],
            )
            .report(ReportStyle::DeployedTo)
    }

    /// Every reference must point at a distinct, earlier step
    pub fn validate(&self) -> Result<(), DeployError> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            for arg in &step.args {
                if let ConstructorArg::Deployed(reference) = arg {
                    if !seen.contains(&reference.as_str()) {
                        return Err(DeployError::UnresolvedReference {
                            step: step.name.clone(),
                            reference: reference.clone(),
                        });
                    }
                }
            }
            if seen.contains(&step.name.as_str()) {
                return Err(DeployError::DuplicateStep(step.name.clone()));
            }
            seen.push(&step.name);
        }
        Ok(())
    }
}

pub fn note_initial_supply() -> U256 {
    U256::from(NOTE_INITIAL_SUPPLY) * U256::exp10(NOTE_DECIMALS)
}

pub struct DeployService<D> {
    deployer: D,
}

impl<D: ContractDeployer> DeployService<D> {
    pub fn new(deployer: D) -> Self {
        Self { deployer }
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    pub async fn run(&self, plan: &DeploymentPlan) -> Result<DeploymentSummary, DeployError> {
        plan.validate()?;

        let started_at = Utc::now();
        let signer = self.deployer.signer();
        info!(plan = %plan.name, steps = plan.steps.len(), signer = ?signer, "Starting deployment");

        let mut deployed: HashMap<&str, Address> = HashMap::new();
        let mut order: Vec<(&DeployStep, Address)> = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            let args = step
                .args
                .iter()
                .map(|arg| resolve_arg(step, arg, &deployed, signer))
                .collect::<Result<Vec<_>, _>>()?;

            info!(step = %step.name, contract = %step.contract, "Deploying");
            let address = self.deployer.deploy(&step.contract, args).await?;

            deployed.insert(step.name.as_str(), address);
            order.push((step, address));
        }

        let mut records = Vec::with_capacity(order.len());
        for (step, address) in order.into_iter().filter(|(step, _)| step.reported) {
            let bytecode_size = self.deployer.bytecode_size(address).await?;
            records.push(DeploymentRecord {
                name: step.name.clone(),
                contract: step.contract.clone(),
                address,
                bytecode_size,
            });
        }

        info!(plan = %plan.name, deployed = records.len(), "Deployment complete");

        Ok(DeploymentSummary {
            plan: plan.name.clone(),
            deployer: signer,
            started_at,
            records,
        })
    }
}

fn resolve_arg(
    step: &DeployStep,
    arg: &ConstructorArg,
    deployed: &HashMap<&str, Address>,
    signer: Address,
) -> Result<Token, DeployError> {
    match arg {
        ConstructorArg::Deployed(reference) => deployed
            .get(reference.as_str())
            .map(|address| Token::Address(*address))
            .ok_or_else(|| DeployError::UnresolvedReference {
                step: step.name.clone(),
                reference: reference.clone(),
            }),
        ConstructorArg::Signer => Ok(Token::Address(signer)),
        ConstructorArg::Literal(token) => Ok(token.clone()),
    }
}
