//! Lookup of compiled contracts in a hardhat `artifacts/` tree.
//!
//! Hardhat writes one json file per contract at
//! `artifacts/<source path>/<ContractName>.json`, next to a `.dbg.json`
//! debug file, and keeps compiler inputs under `artifacts/build-info/`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

const BUILD_INFO_DIR: &str = "build-info";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact for contract `{name}` not found in {root:?}; did the compile step run?")]
    NotFound { name: String, root: PathBuf },
    #[error("contract name `{name}` is ambiguous, candidates: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("failed to read artifact {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse artifact {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact for `{name}` is not deployable: {reason}")]
    NotDeployable { name: String, reason: String },
    #[error("constructor of `{name}` cannot be called without arguments")]
    ConstructorArguments {
        name: String,
        #[source]
        source: ethers::abi::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    source_name: String,
    abi: Abi,
    bytecode: String,
    #[serde(default)]
    link_references: serde_json::Map<String, serde_json::Value>,
}

/// A compiled contract ready to be turned into a deployment transaction.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub path: PathBuf,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    /// `<source>:<contract>`, the way hardhat prints fully qualified names.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Creation code followed by the abi encoded constructor arguments (none).
    pub fn deployment_data(&self) -> Result<Bytes, ArtifactError> {
        if self.bytecode.is_empty() {
            return Err(ArtifactError::NotDeployable {
                name: self.contract_name.clone(),
                reason: "empty bytecode, is it an interface or abstract contract?".to_owned(),
            });
        }

        match self.abi.constructor() {
            None => Ok(self.bytecode.clone()),
            Some(constructor) => constructor
                .encode_input(self.bytecode.to_vec(), &[])
                .map(Bytes::from)
                .map_err(|source| ArtifactError::ConstructorArguments {
                    name: self.contract_name.clone(),
                    source,
                }),
        }
    }

    fn from_hardhat(path: PathBuf, artifact: HardhatArtifact) -> Result<Self, ArtifactError> {
        if !artifact.link_references.is_empty() {
            return Err(ArtifactError::NotDeployable {
                name: artifact.contract_name,
                reason: "bytecode needs linked libraries".to_owned(),
            });
        }

        let bytecode =
            Bytes::from_str(&artifact.bytecode).map_err(|e| ArtifactError::NotDeployable {
                name: artifact.contract_name.clone(),
                reason: format!("invalid bytecode: {e}"),
            })?;

        Ok(Self {
            contract_name: artifact.contract_name,
            source_name: artifact.source_name,
            path,
            abi: artifact.abi,
            bytecode,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Artifacts {
    root: PathBuf,
}

impl Default for Artifacts {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACTS_DIR)
    }
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a contract by name, or by `path/To.sol:Name` when several sources
    /// define the same contract name. Only touches the filesystem.
    pub fn find(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let (source_name, contract_name) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        let mut candidates = Vec::new();
        if self.root.is_dir() {
            collect_candidates(&self.root, contract_name, &mut candidates)?;
        }

        let mut matches = Vec::new();
        for path in candidates {
            let artifact = read_artifact(&path)?;
            if artifact.contract_name != contract_name {
                continue;
            }
            if source_name.is_some_and(|source| source != artifact.source_name) {
                continue;
            }
            matches.push((path, artifact));
        }

        if matches.len() > 1 {
            return Err(ArtifactError::Ambiguous {
                name: name.to_owned(),
                candidates: matches
                    .into_iter()
                    .map(|(_, a)| format!("{}:{}", a.source_name, a.contract_name))
                    .collect(),
            });
        }

        let (path, artifact) = matches.pop().ok_or_else(|| ArtifactError::NotFound {
            name: name.to_owned(),
            root: self.root.clone(),
        })?;

        tracing::debug!(?path, "resolved artifact");
        Artifact::from_hardhat(path, artifact)
    }
}

fn collect_candidates(
    dir: &Path,
    contract_name: &str,
    out: &mut Vec<PathBuf>,
) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: dir.to_owned(),
        source,
    };

    let file_name = format!("{contract_name}.json");
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_candidates(&path, contract_name, out)?;
        } else if path.file_name().is_some_and(|n| n == file_name.as_str()) {
            out.push(path);
        }
    }

    // read_dir order is platform dependent
    out.sort();
    Ok(())
}

fn read_artifact(path: &Path) -> Result<HardhatArtifact, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_owned(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{test_utils::*, *};

    #[test]
    fn finds_artifact_by_contract_name() {
        let dir = tempfile::tempdir().unwrap();
        write_minions20(dir.path());
        fs::create_dir_all(dir.path().join("build-info")).unwrap();
        fs::write(dir.path().join("build-info/Minions20.json"), "not json").unwrap();

        let artifact = Artifacts::new(dir.path()).find("Minions20").unwrap();

        assert_eq!(artifact.contract_name, "Minions20");
        assert_eq!(
            artifact.fully_qualified_name(),
            "contracts/Minions20.sol:Minions20"
        );
        assert_eq!(
            artifact.deployment_data().unwrap(),
            Bytes::from_str(STOP_CONTRACT_BYTECODE).unwrap()
        );
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_minions20(dir.path());

        let err = Artifacts::new(dir.path()).find("Minions721").unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { ref name, .. } if name == "Minions721"));

        let err = Artifacts::new(dir.path().join("nope"))
            .find("Minions20")
            .unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));
    }

    #[test]
    fn same_name_in_two_sources_needs_qualified_name() {
        let dir = tempfile::tempdir().unwrap();
        write_minions20(dir.path());
        write_artifact(
            dir.path(),
            "contracts/legacy/Minions20.sol",
            "Minions20",
            json!([]),
            STOP_CONTRACT_BYTECODE,
        );
        let artifacts = Artifacts::new(dir.path());

        let err = artifacts.find("Minions20").unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::Ambiguous { ref candidates, .. } if candidates.len() == 2
        ));

        let artifact = artifacts
            .find("contracts/legacy/Minions20.sol:Minions20")
            .unwrap();
        assert_eq!(artifact.source_name, "contracts/legacy/Minions20.sol");
    }

    #[test]
    fn interface_is_not_deployable() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "contracts/IMinions.sol", "IMinions", json!([]), "0x");

        let artifact = Artifacts::new(dir.path()).find("IMinions").unwrap();
        assert!(matches!(
            artifact.deployment_data(),
            Err(ArtifactError::NotDeployable { .. })
        ));
    }

    #[test]
    fn constructor_with_inputs_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let abi = json!([{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "supply", "type": "uint256", "internalType": "uint256" }]
        }]);
        write_artifact(
            dir.path(),
            "contracts/Capped.sol",
            "Capped",
            abi,
            STOP_CONTRACT_BYTECODE,
        );

        let artifact = Artifacts::new(dir.path()).find("Capped").unwrap();
        assert!(matches!(
            artifact.deployment_data(),
            Err(ArtifactError::ConstructorArguments { .. })
        ));
    }

    #[test]
    fn broken_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("contracts/Minions20.sol")).unwrap();
        fs::write(dir.path().join("contracts/Minions20.sol/Minions20.json"), "{").unwrap();

        let err = Artifacts::new(dir.path()).find("Minions20").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }
}
