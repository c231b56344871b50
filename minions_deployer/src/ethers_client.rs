use std::sync::Arc;

use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer, Wallet},
};

use crate::{
    config::{NetworkAccounts, NetworkConfig},
    error::DeployError,
};

pub type EtherSigner = SignerMiddleware<Provider<Http>, Wallet<SigningKey>>;

/// The first configured account deploys, same as hardhat's default signer.
pub fn wallet_for_accounts(accounts: &NetworkAccounts) -> Result<LocalWallet, DeployError> {
    match accounts {
        NetworkAccounts::PrivateKeys(keys) => {
            let key = keys
                .first()
                .ok_or_else(|| DeployError::Account("no accounts configured".to_owned()))?;
            key.parse::<LocalWallet>()
                .map_err(|e| DeployError::Account(format!("malformed private key: {e}")))
        }
        NetworkAccounts::Mnemonic { phrase, index } => MnemonicBuilder::<English>::default()
            .phrase(phrase.as_str())
            .index(*index)
            .map_err(|e| DeployError::Account(e.to_string()))?
            .build()
            .map_err(|e| DeployError::Account(e.to_string())),
    }
}

/// Signing client for `network`. Asks the node for its chain id unless the
/// network pins one.
pub async fn get_writer_ethers_client(
    network: &NetworkConfig,
) -> Result<Arc<EtherSigner>, DeployError> {
    let wallet = wallet_for_accounts(&network.accounts)?;

    let provider = Provider::<Http>::try_from(network.url.as_str())
        .map_err(|e| DeployError::Submission(format!("invalid rpc url: {e}")))?;

    let chain_id = match network.chain_id {
        Some(chain_id) => chain_id,
        None => provider
            .get_chainid()
            .await
            .map_err(|e| DeployError::Submission(network.redact(&e.to_string())))?
            .as_u64(),
    };

    tracing::debug!(chain_id, deployer = ?wallet.address(), "built signer");
    Ok(Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    )))
}
