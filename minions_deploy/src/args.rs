use std::{path::PathBuf, time::Duration};

use minions_deployer::{
    artifacts::{Artifacts, DEFAULT_ARTIFACTS_DIR},
    deployer::ConfirmationPolicy,
    DeployRequest, DEFAULT_CONTRACT,
};

/// Deploys a compiled contract and prints its address.
#[derive(clap::Parser, Debug)]
#[clap(version)]
pub struct Arguments {
    /// Contract to deploy, `Name` or `path/To.sol:Name`
    #[clap(long, env = "MINIONS_CONTRACT", default_value = DEFAULT_CONTRACT)]
    pub contract: String,

    /// Network from the deployment config; defaults to the config's default
    #[clap(long, env = "MINIONS_NETWORK")]
    pub network: Option<String>,

    /// Hardhat artifacts directory
    #[clap(long, env = "MINIONS_ARTIFACTS", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    #[clap(
        long,
        env = "MINIONS_CONFIRMATION_TIMEOUT",
        default_value = "5m",
        value_parser = humantime::parse_duration
    )]
    pub confirmation_timeout: Duration,

    #[clap(
        long,
        env = "MINIONS_POLL_INTERVAL",
        default_value = "4s",
        value_parser = humantime::parse_duration
    )]
    pub poll_interval: Duration,

    #[clap(
        long,
        env = "MINIONS_LOG_FILTER",
        default_value = "warn,minions_deployer=info,minions_deploy=info"
    )]
    pub log_filter: String,
}

impl Arguments {
    pub fn deploy_request(&self) -> DeployRequest {
        DeployRequest {
            contract_name: self.contract.clone(),
            network: self.network.clone(),
            artifacts: Artifacts::new(&self.artifacts),
            confirmation: ConfirmationPolicy {
                timeout: self.confirmation_timeout,
                poll_interval: self.poll_interval,
            },
        }
    }
}
