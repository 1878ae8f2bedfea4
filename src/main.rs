use clap::Parser;

use dao_interface::cli::{run_cli, Cli};
use dao_interface::config::Config;
use dao_interface::telemetry::init_telemetry;

#[tokio::main]
async fn main() {
    // Flags fall back to variables from .env
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize telemetry
    init_telemetry();

    let result = match Config::from_env() {
        Ok(config) => run_cli(cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
