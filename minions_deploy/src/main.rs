mod args;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use minions_deployer::{
    config::DeployConfig, deploy_contract, deployer::DeploymentResult, error::DeployError,
};

use crate::args::Arguments;

#[tokio::main]
async fn main() -> ExitCode {
    // the only place .env is loaded; flags and the deploy config both read it
    dotenv::dotenv().ok();
    let args = Arguments::parse();
    logging::initialize(&args.log_filter);

    match run(&args).await {
        Ok(result) => {
            println!(
                "Contract deployed to address: {}",
                result.address_checksummed()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            // printed regardless of the log filter
            eprintln!("Error: {err:?}");
            if err
                .downcast_ref::<DeployError>()
                .is_some_and(DeployError::is_local)
            {
                eprintln!("nothing was sent to the network");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Arguments) -> anyhow::Result<DeploymentResult> {
    println!("Preparing deployment...\n");

    let config = DeployConfig::from_env();
    let request = args.deploy_request();

    deploy_contract(&config, &request)
        .await
        .with_context(|| format!("failed to deploy {}", request.contract_name))
}
