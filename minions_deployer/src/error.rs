use std::time::Duration;

use ethers::types::TxHash;
use thiserror::Error;

use crate::{
    artifacts::ArtifactError,
    config::{ConfigError, NetworkConfig},
};

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("invalid deployer account: {0}")]
    Account(String),
    #[error("failed to submit deployment transaction: {0}")]
    Submission(String),
    #[error("failed to fetch transaction receipt: {0}")]
    Receipt(String),
    #[error("deployment transaction {tx_hash:?} not confirmed within {timeout:?}")]
    ConfirmationTimeout { tx_hash: TxHash, timeout: Duration },
    #[error("deployment transaction {tx_hash:?} reverted: {reason}")]
    Reverted { tx_hash: TxHash, reason: String },
    #[error("receipt of deployment transaction {tx_hash:?} has no contract address")]
    MissingContractAddress { tx_hash: TxHash },
}

impl DeployError {
    /// True for failures detected before anything was sent to a node.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Artifact(_) | Self::Account(_)
        )
    }

    /// Node and transport messages can echo the rpc url; strip its secrets.
    pub fn redacted(self, network: &NetworkConfig) -> Self {
        match self {
            Self::Submission(message) => Self::Submission(network.redact(&message)),
            Self::Receipt(message) => Self::Receipt(network.redact(&message)),
            other => other,
        }
    }
}
