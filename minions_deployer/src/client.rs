use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    providers::{Middleware, MiddlewareError},
    types::{transaction::eip2718::TypedTransaction, Address, BlockId, TransactionReceipt, TxHash},
};

use crate::error::DeployError;

/// The part of a chain client the deployer needs.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Account the transaction is sent from, if the client signs.
    fn sender(&self) -> Option<Address>;

    async fn submit_deployment(&self, tx: TypedTransaction) -> Result<TxHash, DeployError>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, DeployError>;

    /// Replays a reverted transaction to recover the node's revert message.
    async fn revert_reason(&self, tx: &TypedTransaction, block: Option<BlockId>) -> Option<String>;
}

#[async_trait]
impl<M> DeploymentClient for Arc<M>
where
    M: Middleware + 'static,
{
    fn sender(&self) -> Option<Address> {
        self.default_sender()
    }

    async fn submit_deployment(&self, tx: TypedTransaction) -> Result<TxHash, DeployError> {
        let pending = self
            .send_transaction(tx, None)
            .await
            .map_err(|e| DeployError::Submission(e.to_string()))?;

        Ok(*pending)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, DeployError> {
        self.get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| DeployError::Receipt(e.to_string()))
    }

    async fn revert_reason(&self, tx: &TypedTransaction, block: Option<BlockId>) -> Option<String> {
        match self.call(tx, block).await {
            Ok(_) => None,
            Err(e) => Some(
                e.as_error_response()
                    .map(|rpc_err| rpc_err.message.clone())
                    .unwrap_or_else(|| e.to_string()),
            ),
        }
    }
}
