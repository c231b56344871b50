pub mod artifacts;
pub mod client;
pub mod config;
pub mod deployer;
pub mod error;
pub mod ethers_client;

use artifacts::Artifacts;
use config::DeployConfig;
use deployer::{ConfirmationPolicy, ContractFactory, Deployer, DeploymentResult};
use error::DeployError;

pub const DEFAULT_CONTRACT: &str = "Minions20";

/// One deployment run: which contract, where, and how long to wait.
#[derive(Clone, Debug)]
pub struct DeployRequest {
    pub contract_name: String,
    pub network: Option<String>,
    pub artifacts: Artifacts,
    pub confirmation: ConfirmationPolicy,
}

impl Default for DeployRequest {
    fn default() -> Self {
        Self {
            contract_name: DEFAULT_CONTRACT.to_owned(),
            network: None,
            artifacts: Artifacts::default(),
            confirmation: ConfirmationPolicy::default(),
        }
    }
}

/// Resolve the network and the contract factory, then deploy with the
/// network's first account. Nothing is sent to a node until the artifact has
/// been found and the account parsed.
pub async fn deploy_contract(
    config: &DeployConfig,
    request: &DeployRequest,
) -> Result<DeploymentResult, DeployError> {
    let (network_name, network) = config.network(request.network.as_deref())?;
    tracing::info!(network = network_name, url = %network.display_url(), "selected network");

    let factory = ContractFactory::from_artifacts(&request.artifacts, &request.contract_name)?;
    tracing::info!(
        artifact = ?factory.artifact().path,
        solidity = %config.solidity,
        "resolved contract factory"
    );

    let signer = ethers_client::get_writer_ethers_client(network).await?;
    Deployer::new(signer, request.confirmation.clone())
        .deploy(&factory)
        .await
        .map_err(|err| err.redacted(network))
}
