use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use bon::Builder;
use tracing::{info, warn, Instrument};

use super::receipts::wait_for_receipt;
use super::PollingConfig;
use crate::contracts::facilitator::{withdraw_eth_transaction, withdraw_tokens_transaction};
use crate::error::{OffsetZapError, Result};
use crate::spans;
use crate::traits::{ChainClient, Clock};

/// Owner-only maintenance of the Facilitator contract
///
/// Funds stranded in the Facilitator (failed retirements, dust) can only be
/// withdrawn by its owner. Ownership is checked against `owner()` before
/// anything is signed, so a non-owner caller never broadcasts a transaction
/// that would revert.
#[derive(Builder)]
pub struct FacilitatorAdmin<C, K> {
    client: C,
    clock: K,
    facilitator: Address,
    /// Account the withdrawal transactions are sent from
    caller: Address,
    #[builder(default = PollingConfig::receipts())]
    receipt_polling: PollingConfig,
}

impl<C, K> FacilitatorAdmin<C, K>
where
    C: ChainClient,
    K: Clock,
{
    /// Current owner of the Facilitator
    pub async fn owner(&self) -> Result<Address> {
        self.client.contract_owner(self.facilitator).await
    }

    /// Withdraws `amount` of `token` to the owner.
    pub async fn withdraw_tokens(&self, token: Address, amount: U256) -> Result<TxHash> {
        let span = spans::facilitator_withdrawal(&self.facilitator, &self.caller, Some(&token), &amount);
        async move {
            self.ensure_owner().await?;
            let tx = withdraw_tokens_transaction(self.facilitator, self.caller, token, amount);
            self.send(tx).await
        }
        .instrument(span)
        .await
    }

    /// Withdraws `amount` wei of the native token to the owner.
    pub async fn withdraw_eth(&self, amount: U256) -> Result<TxHash> {
        let span = spans::facilitator_withdrawal(&self.facilitator, &self.caller, None, &amount);
        async move {
            self.ensure_owner().await?;
            let tx = withdraw_eth_transaction(self.facilitator, self.caller, amount);
            self.send(tx).await
        }
        .instrument(span)
        .await
    }

    async fn ensure_owner(&self) -> Result<()> {
        let owner = self.owner().await?;
        if owner != self.caller {
            let error = OffsetZapError::NotOwner {
                caller: self.caller,
                owner,
                contract: self.facilitator,
            };
            spans::record_error(&error);
            warn!(
                caller = %self.caller,
                owner = %owner,
                event = "withdrawal_refused"
            );
            return Err(error);
        }
        Ok(())
    }

    async fn send(&self, tx: TransactionRequest) -> Result<TxHash> {
        let tx_hash = self.client.send_transaction(tx).await?;
        let receipt =
            wait_for_receipt(&self.client, &self.clock, self.receipt_polling, tx_hash).await?;

        if !receipt.success {
            return Err(OffsetZapError::TransactionReverted {
                tx_hash,
                step: "withdraw",
            });
        }

        info!(tx_hash = %tx_hash, event = "withdrawal_confirmed");
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChainClient, FakeClock};
    use alloy_primitives::address;

    const FACILITATOR: Address = address!("4444444444444444444444444444444444444444");
    const OWNER: Address = address!("5555555555555555555555555555555555555555");

    fn admin(client: FakeChainClient, caller: Address) -> FacilitatorAdmin<FakeChainClient, FakeClock> {
        FacilitatorAdmin::builder()
            .client(client)
            .clock(FakeClock::new())
            .facilitator(FACILITATOR)
            .caller(caller)
            .build()
    }

    #[tokio::test]
    async fn test_owner_can_withdraw() {
        let client = FakeChainClient::new(137);
        client.set_owner(FACILITATOR, OWNER);

        let tx_hash = admin(client.clone(), OWNER)
            .withdraw_eth(U256::from(1_000u64))
            .await
            .unwrap();

        assert_eq!(client.sent_transactions().len(), 1);
        assert_ne!(tx_hash, TxHash::ZERO);
    }

    #[tokio::test]
    async fn test_reverted_withdrawal_is_an_error() {
        let client = FakeChainClient::new(137);
        client.set_owner(FACILITATOR, OWNER);
        client.revert_next_transaction();

        let result = admin(client, OWNER)
            .withdraw_tokens(Address::ZERO, U256::from(1u64))
            .await;

        assert!(matches!(
            result,
            Err(OffsetZapError::TransactionReverted { step: "withdraw", .. })
        ));
    }
}
