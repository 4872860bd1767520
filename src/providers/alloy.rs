//! Alloy-based chain client implementation.

use alloy_chains::NamedChain;
use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::contracts::erc20::Erc20Contract;
use crate::contracts::facilitator::FacilitatorContract;
use crate::error::{classify_provider_error, OffsetZapError, Result};
use crate::protocol::ReceiptSummary;
use crate::spans;
use crate::traits::ChainClient;

/// Production chain client wrapping Alloy's [`Provider`] trait.
///
/// The provider is expected to carry a wallet filler for the chains where
/// transactions are sent (origin for deposits, destination for Facilitator
/// withdrawals); read-only providers work for everything else.
///
/// # Examples
///
/// ```rust,no_run
/// use offsetzap_rs::providers::AlloyChainClient;
/// use alloy_chains::NamedChain;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("https://mainnet.base.org").await?;
/// let base = AlloyChainClient::new(provider, NamedChain::Base);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainClient<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
    chain: NamedChain,
}

impl<P> AlloyChainClient<P>
where
    P: Provider<Ethereum> + Clone,
{
    /// Creates a new [`AlloyChainClient`] for `chain`.
    pub fn new(provider: P, chain: NamedChain) -> Self {
        Self { provider, chain }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }

    pub fn chain(&self) -> NamedChain {
        self.chain
    }
}

#[async_trait]
impl<P> ChainClient for AlloyChainClient<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    fn chain_id(&self) -> u64 {
        u64::from(self.chain)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash, chain = %self.chain))]
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<ReceiptSummary>> {
        trace!("Fetching transaction receipt");
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| OffsetZapError::Provider(e.to_string()))?;

        let Some(receipt) = receipt else {
            debug!("Transaction receipt not found");
            return Ok(None);
        };

        let summary = ReceiptSummary {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        };

        debug!(
            success = summary.success,
            log_count = summary.logs.len(),
            "Transaction receipt found"
        );
        Ok(Some(summary))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await.map_err(|e| {
            let error = classify_provider_error(e.to_string());
            spans::record_error(&error);
            error
        })?;

        let tx_hash = *pending.tx_hash();
        let span = spans::send_transaction(tx_hash, &self.chain);
        let _guard = span.enter();
        debug!(event = "transaction_broadcast");

        Ok(tx_hash)
    }

    async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        Erc20Contract::new(token, self.provider.clone())
            .allowance(owner, spender)
            .await
            .map_err(|e| OffsetZapError::ContractCall(e.to_string()))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        Erc20Contract::new(token, self.provider.clone())
            .balance_of(owner)
            .await
            .map_err(|e| OffsetZapError::ContractCall(e.to_string()))
    }

    async fn contract_owner(&self, contract: Address) -> Result<Address> {
        FacilitatorContract::new(contract, self.provider.clone())
            .owner()
            .await
            .map_err(|e| OffsetZapError::ContractCall(e.to_string()))
    }

    #[instrument(skip(self), fields(address = %address, chain = %self.chain))]
    async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| OffsetZapError::Provider(e.to_string()))
    }
}
