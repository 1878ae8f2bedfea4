//! Compiled contract artifacts.
//!
//! Artifacts follow the Hardhat layout: `<root>/contracts/<File>.sol/<Name>.json`
//! holding `contractName`, `abi` and creation `bytecode`. Lookup is by contract
//! name anywhere under the root; `<Name>.dbg.json` companions never match.

use ethers::abi::{Abi, Token};
use ethers::types::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("No artifact for contract '{name}' under {root}")]
    NotFound { name: String, root: String },

    #[error("Contract '{0}' has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode(String),

    #[error("Constructor of '{contract}' expects {expected} argument(s), got {got}")]
    ArgumentCount {
        contract: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid constructor arguments for '{contract}': {reason}")]
    InvalidArguments { contract: String, reason: String },

    #[error("Failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed artifact {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Creation bytecode followed by the ABI-encoded constructor arguments
    pub fn deploy_data(&self, args: &[Token]) -> Result<Bytes, ArtifactError> {
        if self.bytecode.is_empty() {
            return Err(ArtifactError::EmptyBytecode(self.contract_name.clone()));
        }

        let expected = self
            .abi
            .constructor()
            .map(|c| c.inputs.len())
            .unwrap_or(0);
        if expected != args.len() {
            return Err(ArtifactError::ArgumentCount {
                contract: self.contract_name.clone(),
                expected,
                got: args.len(),
            });
        }

        match self.abi.constructor() {
            Some(constructor) => constructor
                .encode_input(self.bytecode.to_vec(), args)
                .map(Bytes::from)
                .map_err(|e| ArtifactError::InvalidArguments {
                    contract: self.contract_name.clone(),
                    reason: e.to_string(),
                }),
            None => Ok(self.bytecode.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let file_name = format!("{}.json", name);
        let path = find_file(&self.root, &file_name)?.ok_or_else(|| ArtifactError::NotFound {
            name: name.to_string(),
            root: self.root.display().to_string(),
        })?;

        debug!(contract = name, path = %path.display(), "Loading artifact");

        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|source| ArtifactError::Malformed {
            path: path.display().to_string(),
            source,
        })
    }
}

fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, std::io::Error> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
            return Ok(Some(path));
        }
    }

    subdirs.sort();
    for subdir in subdirs {
        if let Some(found) = find_file(&subdir, file_name)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, U256};
    use tokio_test::{assert_err, assert_ok};

    const TOKEN_ARTIFACT: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "DAOToken",
        "sourceName": "contracts/DAOToken.sol",
        "abi": [
            {
                "type": "constructor",
                "stateMutability": "nonpayable",
                "inputs": [
                    {"name": "name", "type": "string", "internalType": "string"},
                    {"name": "symbol", "type": "string", "internalType": "string"},
                    {"name": "owner", "type": "address", "internalType": "address"},
                    {"name": "supply", "type": "uint256", "internalType": "uint256"}
                ]
            }
        ],
        "bytecode": "0x6080604052",
        "deployedBytecode": "0x6080"
    }"#;

    const PLAIN_ARTIFACT: &str = r#"{
        "contractName": "Turnstile",
        "abi": [],
        "bytecode": "0x60016002"
    }"#;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let token_dir = dir.path().join("contracts").join("DAOToken.sol");
        std::fs::create_dir_all(&token_dir).unwrap();
        std::fs::write(token_dir.join("DAOToken.json"), TOKEN_ARTIFACT).unwrap();
        std::fs::write(token_dir.join("DAOToken.dbg.json"), "{}").unwrap();

        let turnstile_dir = dir.path().join("contracts").join("Turnstile.sol");
        std::fs::create_dir_all(&turnstile_dir).unwrap();
        std::fs::write(turnstile_dir.join("Turnstile.json"), PLAIN_ARTIFACT).unwrap();

        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_nested_artifact() {
        let (_dir, store) = store();
        let artifact = store.load("DAOToken").unwrap();
        assert_eq!(artifact.contract_name, "DAOToken");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_missing_artifact() {
        let (_dir, store) = store();
        let err = store.load("DAOFactory").unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }

    #[test]
    fn test_deploy_data_appends_constructor_args() {
        let (_dir, store) = store();
        let artifact = store.load("DAOToken").unwrap();

        let data = artifact
            .deploy_data(&[
                Token::String("Note".to_string()),
                Token::String("NOTE".to_string()),
                Token::Address(Address::from_low_u64_be(1)),
                Token::Uint(U256::from(1000)),
            ])
            .unwrap();

        assert_eq!(&data[..5], artifact.bytecode.as_ref());
        // four head words plus two dynamic string tails of two words each
        assert_eq!(data.len(), 5 + 32 * 8);
    }

    #[test]
    fn test_deploy_data_rejects_wrong_arity() {
        let (_dir, store) = store();
        let artifact = store.load("DAOToken").unwrap();
        let err = artifact
            .deploy_data(&[Token::String("Note".to_string())])
            .unwrap_err();

        match err {
            ArtifactError::ArgumentCount { expected, got, .. } => {
                assert_eq!(expected, 4);
                assert_eq!(got, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_deploy_data_without_constructor() {
        let (_dir, store) = store();
        let artifact = assert_ok!(store.load("Turnstile"));
        assert_eq!(assert_ok!(artifact.deploy_data(&[])), artifact.bytecode);
        assert_err!(artifact.deploy_data(&[Token::Uint(U256::one())]));
    }
}
