use std::time::Duration;

use ethers::{
    types::{
        transaction::eip2718::TypedTransaction, Address, BlockId, BlockNumber,
        Eip1559TransactionRequest, TxHash, U64,
    },
    utils::to_checksum,
};

use crate::{
    artifacts::{Artifact, Artifacts},
    client::DeploymentClient,
    error::DeployError,
};

const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Builds deployment transactions for one compiled contract.
#[derive(Clone, Debug)]
pub struct ContractFactory {
    artifact: Artifact,
}

impl ContractFactory {
    pub fn new(artifact: Artifact) -> Self {
        Self { artifact }
    }

    /// Resolve `contract_name` in `artifacts`. Never touches the network.
    pub fn from_artifacts(artifacts: &Artifacts, contract_name: &str) -> Result<Self, DeployError> {
        let artifact = artifacts.find(contract_name)?;
        // surface constructor / bytecode problems before any account is used
        artifact.deployment_data()?;
        Ok(Self::new(artifact))
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn deploy_transaction(&self) -> Result<TypedTransaction, DeployError> {
        let data = self.artifact.deployment_data()?;
        Ok(Eip1559TransactionRequest::new().data(data).into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentResult {
    pub contract_address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<U64>,
}

impl DeploymentResult {
    /// EIP-55 form of the contract address, as hardhat prints it.
    pub fn address_checksummed(&self) -> String {
        to_checksum(&self.contract_address, None)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed(DeploymentResult),
    TimedOut,
    Reverted(String),
}

pub struct Deployer<C> {
    client: C,
    policy: ConfirmationPolicy,
}

impl<C> Deployer<C>
where
    C: DeploymentClient,
{
    pub fn new(client: C, policy: ConfirmationPolicy) -> Self {
        Self { client, policy }
    }

    /// Submit a fresh deployment and wait for it to be mined. Every call sends
    /// a new transaction.
    pub async fn deploy(&self, factory: &ContractFactory) -> Result<DeploymentResult, DeployError> {
        let mut tx = factory.deploy_transaction()?;
        if let Some(sender) = self.client.sender() {
            tx.set_from(sender);
        }

        let tx_hash = self.client.submit_deployment(tx.clone()).await?;
        tracing::info!(
            contract = %factory.artifact().fully_qualified_name(),
            ?tx_hash,
            "submitted deployment transaction"
        );

        match self.await_confirmation(tx_hash, &tx).await? {
            Confirmation::Confirmed(result) => {
                tracing::info!(
                    address = ?result.contract_address,
                    block = ?result.block_number,
                    "deployment confirmed"
                );
                Ok(result)
            }
            Confirmation::TimedOut => Err(DeployError::ConfirmationTimeout {
                tx_hash,
                timeout: self.policy.timeout,
            }),
            Confirmation::Reverted(reason) => Err(DeployError::Reverted { tx_hash, reason }),
        }
    }

    /// Poll for the receipt of `tx_hash` until it shows up or the policy
    /// timeout elapses. Receipt lookups that fail are retried on the next tick.
    pub async fn await_confirmation(
        &self,
        tx_hash: TxHash,
        tx: &TypedTransaction,
    ) -> Result<Confirmation, DeployError> {
        let poll = async {
            let period = self.policy.poll_interval.max(MIN_POLL_INTERVAL);
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match self.client.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => tracing::trace!(?tx_hash, "transaction still pending"),
                    Err(err) => tracing::warn!(?tx_hash, %err, "receipt lookup failed"),
                }
            }
        };

        let Ok(receipt) = tokio::time::timeout(self.policy.timeout, poll).await else {
            return Ok(Confirmation::TimedOut);
        };

        if receipt.status == Some(U64::zero()) {
            let block = receipt
                .block_number
                .map(|number| BlockId::Number(BlockNumber::Number(number)));
            let reason = self
                .client
                .revert_reason(tx, block)
                .await
                .unwrap_or_else(|| "execution reverted".to_owned());
            return Ok(Confirmation::Reverted(reason));
        }

        let contract_address = receipt
            .contract_address
            .ok_or(DeployError::MissingContractAddress { tx_hash })?;

        Ok(Confirmation::Confirmed(DeploymentResult {
            contract_address,
            transaction_hash: tx_hash,
            block_number: receipt.block_number,
        }))
    }
}
