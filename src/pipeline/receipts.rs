use alloy_primitives::TxHash;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};

use super::PollingConfig;
use crate::error::{OffsetZapError, Result};
use crate::protocol::ReceiptSummary;
use crate::spans;
use crate::traits::{ChainClient, Clock};

/// Polls `client` until the receipt of `tx_hash` is available.
///
/// RPC errors while polling are logged and retried: the transaction is
/// already broadcast, so losing sight of it says nothing about its outcome.
/// A missing receipt after `polling.max_attempts` is a
/// [`ReceiptTimeout`](OffsetZapError::ReceiptTimeout).
///
/// Success or revert is reported through [`ReceiptSummary::success`] and
/// left to the caller to interpret.
pub async fn wait_for_receipt<C, K>(
    client: &C,
    clock: &K,
    polling: PollingConfig,
    tx_hash: TxHash,
) -> Result<ReceiptSummary>
where
    C: ChainClient + ?Sized,
    K: Clock + ?Sized,
{
    let span = spans::wait_for_receipt(tx_hash, client.chain_id(), polling.max_attempts);

    async move {
        for attempt in 1..=polling.max_attempts {
            match client.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    info!(
                        block_number = receipt.block_number,
                        success = receipt.success,
                        attempt = attempt,
                        event = "receipt_received"
                    );
                    return Ok(receipt);
                }
                Ok(None) => {
                    debug!(attempt = attempt, event = "receipt_pending");
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        attempt = attempt,
                        event = "receipt_poll_failed"
                    );
                }
            }
            clock
                .sleep(Duration::from_secs(polling.poll_interval_secs))
                .await;
        }

        spans::record_error_with_context(
            "ReceiptTimeout",
            &format!("No receipt for {tx_hash} after {} attempts", polling.max_attempts),
            Some(&format!(
                "Total duration: {} seconds",
                polling.total_timeout_secs()
            )),
        );
        Err(OffsetZapError::ReceiptTimeout { tx_hash })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeChainClient, FakeClock};

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let client = FakeChainClient::new(8453);
        let clock = FakeClock::new();
        let polling = PollingConfig::receipts()
            .with_max_attempts(4)
            .with_poll_interval_secs(3);

        let result = wait_for_receipt(&client, &clock, polling, TxHash::from([9u8; 32])).await;

        assert!(matches!(result, Err(OffsetZapError::ReceiptTimeout { .. })));
        assert_eq!(clock.sleep_count(), 4);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(12));
    }

    #[tokio::test]
    async fn test_rpc_errors_are_retried() {
        let client = FakeChainClient::new(8453);
        let clock = FakeClock::new();
        let tx_hash = TxHash::from([7u8; 32]);
        client.fail_receipt_lookups(tx_hash, 2);
        client.add_receipt(ReceiptSummary {
            transaction_hash: tx_hash,
            block_number: Some(100),
            success: true,
            logs: vec![],
        });

        let receipt = wait_for_receipt(&client, &clock, PollingConfig::receipts(), tx_hash)
            .await
            .unwrap();

        assert!(receipt.success);
        assert_eq!(clock.sleep_count(), 2);
    }
}
