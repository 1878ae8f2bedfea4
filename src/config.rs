use ethers::types::Address;
use std::env;
use std::path::PathBuf;

use crate::address_book::NETWORK_ENV_VAR;
use crate::chain::{ConfirmationConfig, NetworkConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub chain: ChainConfig,
    pub deploy: DeployConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Address book entry to use; `None` selects the default network
    pub network: Option<String>,
    pub address_book_path: Option<PathBuf>,
    /// Account used for transactions; defaults to the node's first account
    pub sender: Option<Address>,
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub artifacts_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl ChainConfig {
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig::custom(self.rpc_url.clone())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| NetworkConfig::localhost().rpc_url);
        let network = optional_var(NETWORK_ENV_VAR);
        let address_book_path = optional_var("ADDRESS_BOOK_PATH").map(PathBuf::from);
        let sender = optional_var("SENDER_ADDRESS")
            .map(|s| s.parse::<Address>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("SENDER_ADDRESS: {}", e))?;

        let defaults = ConfirmationConfig::default();
        let confirmation = ConfirmationConfig {
            max_attempts: parse_var("CONFIRMATION_MAX_ATTEMPTS", defaults.max_attempts)?,
            initial_delay_ms: parse_var("CONFIRMATION_POLL_MS", defaults.initial_delay_ms)?,
            max_delay_ms: parse_var("CONFIRMATION_MAX_DELAY_MS", defaults.max_delay_ms)?,
            backoff_multiplier: defaults.backoff_multiplier,
        };

        let artifacts_dir = PathBuf::from(env::var("ARTIFACTS_DIR").unwrap_or_else(|_| "artifacts".to_string()));

        let port: u16 = parse_var("PORT", 3001)?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        Ok(Config {
            chain: ChainConfig {
                rpc_url,
                network,
                address_book_path,
                sender,
                confirmation,
            },
            deploy: DeployConfig { artifacts_dir },
            server: ServerConfig { port, host },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}: {}", key, e)),
        None => Ok(default),
    }
}
