//! Deployed contract addresses per network.
//!
//! The book is a static JSON document compiled into the binary and updated by
//! hand after each deployment run. A replacement document can be supplied at
//! runtime through `ADDRESS_BOOK_PATH`.

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Network used when no selector is configured
pub const DEFAULT_NETWORK: &str = "localhost";
/// Canto testnet entry of the embedded book
pub const CANTO_TESTNET_NETWORK: &str = "cantotest";
/// Environment variable selecting the active network
pub const NETWORK_ENV_VAR: &str = "NEXT_PUBLIC_NETWORK";

const EMBEDDED_ADDRESSES: &str = include_str!("../config/addresses.json");

#[derive(Debug, Error)]
pub enum AddressBookError {
    #[error("Unknown network '{network}' (known: {known})")]
    UnknownNetwork { network: String, known: String },

    #[error("Invalid address book: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read address book: {0}")]
    Io(#[from] std::io::Error),
}

/// Addresses recorded for a single network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAddresses {
    pub note: Address,
    pub dao_factory: Address,
    #[serde(default)]
    pub dao_list: Vec<Address>,
}

/// Mapping from network name to its deployed addresses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    networks: BTreeMap<String, NetworkAddresses>,
}

impl AddressBook {
    /// Book compiled into the binary
    pub fn embedded() -> Result<Self, AddressBookError> {
        Self::from_json(EMBEDDED_ADDRESSES)
    }

    pub fn from_json(json: &str) -> Result<Self, AddressBookError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AddressBookError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load the override file when configured, otherwise the embedded book
    pub fn load(path: Option<&Path>) -> Result<Self, AddressBookError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, network: &str) -> Option<&NetworkAddresses> {
        self.networks.get(network)
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }
}

/// Address lookups bound to one selected network
#[derive(Debug, Clone)]
pub struct AddressResolver {
    network: String,
    addresses: NetworkAddresses,
}

impl AddressResolver {
    /// Select `network` from the book. `None` or an empty name selects
    /// [`DEFAULT_NETWORK`]; a name missing from the book is an error.
    pub fn new(book: &AddressBook, network: Option<&str>) -> Result<Self, AddressBookError> {
        let network = match network {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => DEFAULT_NETWORK,
        };

        let addresses = book
            .get(network)
            .cloned()
            .ok_or_else(|| AddressBookError::UnknownNetwork {
                network: network.to_string(),
                known: book.networks().collect::<Vec<_>>().join(", "),
            })?;

        Ok(Self {
            network: network.to_string(),
            addresses,
        })
    }

    /// Select the network named by [`NETWORK_ENV_VAR`]
    pub fn from_env(book: &AddressBook) -> Result<Self, AddressBookError> {
        let selected = std::env::var(NETWORK_ENV_VAR).ok();
        Self::new(book, selected.as_deref())
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn addresses(&self) -> &NetworkAddresses {
        &self.addresses
    }

    pub fn note_address(&self) -> Address {
        self.addresses.note
    }

    pub fn dao_factory_address(&self) -> Address {
        self.addresses.dao_factory
    }

    pub fn dao_list_addresses(&self) -> &[Address] {
        &self.addresses.dao_list
    }
}
