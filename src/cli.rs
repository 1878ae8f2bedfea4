//! Command line entry points: the two deploy scripts and the API server

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use crate::address_book::{AddressBook, AddressResolver, NETWORK_ENV_VAR};
use crate::artifacts::ArtifactStore;
use crate::chain::{ChainClient, RpcClient};
use crate::config::Config;
use crate::http::{configure, AppState};
use crate::middleware::cors_middleware;
use crate::models::DeploymentSummary;
use crate::service::{DeployService, DeploymentPlan, ReportStyle, RpcDeployer};

#[derive(Debug, Parser)]
#[command(name = "dao-interface", version, about = "Deploy and operate the DAO governance contracts")]
pub struct Cli {
    /// JSON-RPC endpoint of the node
    #[arg(long, global = true, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Address book network to use
    #[arg(long, global = true, env = NETWORK_ENV_VAR)]
    pub network: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the read and vote API
    Serve,
    /// Deploy the factory suite
    DeployFactory {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Deploy the NOTE token
    DeployNote {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The plan's own report: a table for the factory, one line for the token
    Text,
    Json,
}

impl Cli {
    /// Flags take precedence over the environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.rpc_url {
            config.chain.rpc_url = url.clone();
        }
        if let Some(network) = &self.network {
            config.chain.network = Some(network.clone());
        }
    }
}

pub async fn run_cli(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    cli.apply(&mut config);

    match cli.command {
        Command::Serve => serve(config).await,
        Command::DeployFactory { format } => deploy(&config, DeploymentPlan::factory(), format).await,
        Command::DeployNote { format } => deploy(&config, DeploymentPlan::note(), format).await,
    }
}

fn chain_client(config: &Config) -> Arc<dyn ChainClient> {
    Arc::new(RpcClient::with_confirmation_config(
        config.chain.network_config(),
        config.chain.confirmation.clone(),
    ))
}

async fn deploy(config: &Config, plan: DeploymentPlan, format: OutputFormat) -> anyhow::Result<()> {
    let chain = chain_client(config);
    let artifacts = ArtifactStore::new(config.deploy.artifacts_dir.clone());
    let deployer = RpcDeployer::connect(chain, artifacts, config.chain.sender).await?;

    let summary = DeployService::new(deployer).run(&plan).await?;
    print!("{}", render(&summary, plan.report, format)?);
    Ok(())
}

fn render(
    summary: &DeploymentSummary,
    report: ReportStyle,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match (format, report) {
        (OutputFormat::Text, ReportStyle::Table) => Ok(summary.render_table()),
        (OutputFormat::Text, ReportStyle::DeployedTo) => Ok(summary.render_deployed_to()),
        (OutputFormat::Json, _) => serde_json::to_string_pretty(summary)
            .map(|json| json + "\n")
            .context("Failed to serialize deployment summary"),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let book = AddressBook::load(config.chain.address_book_path.as_deref())?;
    let resolver = AddressResolver::new(&book, config.chain.network.as_deref())?;
    let state = web::Data::new(AppState::new(
        chain_client(&config),
        resolver,
        config.chain.sender,
    ));

    info!(
        network = %state.daos.network().network,
        rpc_url = %config.chain.rpc_url,
        "Starting DAO interface server on {}:{}",
        config.server.host,
        config.server.port
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received, stopping server...");
            server_handle.stop(true).await;
        }
    });

    server.await?;
    Ok(())
}
