//! Test utilities and fake implementations for testing retirements
//!
//! This module provides fake implementations of the pipeline traits that enable
//! comprehensive testing including adversarial scenarios without requiring actual
//! blockchain or API interactions.
//!
//! These fakes are designed to be used in integration tests to verify the behavior
//! of the `RetirementPipeline` under conditions like reverted deposits, fills that
//! never arrive, rate limiting, relay outages and stale quotes.

use alloy_chains::NamedChain;
use alloy_primitives::{address, Address, Bytes, Log, TxHash, TxKind, B256, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::chain::addresses::BASE_SPOKE_POOL_ADDRESS;
use crate::contracts::spoke_pool::SpokePool::{
    FillType, FilledRelay, FilledV3Relay, FundsDeposited, RelayExecutionEventInfo,
    V3FundsDeposited, V3RelayExecutionEventInfo,
};
use crate::traits::{ChainClient, Clock, DepositStatusProvider, NotificationRelay, QuoteProvider};
use crate::{
    classify_provider_error, DepositParams, DepositStatusResponse, OffsetZapError, PoolToken,
    Quote, ReceiptSummary, RelayFees, Result, RetirementNotification, RetirementRequest,
};

// ============================================================================
// Fake Chain Client
// ============================================================================

#[derive(Debug, Default)]
struct ChainState {
    receipts: HashMap<TxHash, ReceiptSummary>,
    receipt_failures: HashMap<TxHash, usize>,
    pending_polls: HashMap<TxHash, usize>,
    target_receipt_delays: HashMap<Address, usize>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    owners: HashMap<Address, Address>,
    code: HashMap<Address, Bytes>,
    target_logs: HashMap<Address, Vec<Log>>,
    revert_next: bool,
    send_failures: VecDeque<String>,
    sent: Vec<TransactionRequest>,
}

/// A fake chain that mines every sent transaction instantly.
///
/// This allows testing scenarios like:
/// - Reverted approvals, deposits and withdrawals
/// - Wallet rejections and node errors on send
/// - Receipts that take a few polls to show up
/// - Contract beneficiaries and non-owner callers
#[derive(Clone, Debug)]
pub struct FakeChainClient {
    chain_id: u64,
    state: Arc<Mutex<ChainState>>,
}

impl FakeChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: Arc::new(Mutex::new(ChainState::default())),
        }
    }

    pub fn for_chain(chain: NamedChain) -> Self {
        Self::new(u64::from(chain))
    }

    /// Add a receipt that will be returned for its transaction hash
    pub fn add_receipt(&self, receipt: ReceiptSummary) {
        self.state
            .lock()
            .unwrap()
            .receipts
            .insert(receipt.transaction_hash, receipt);
    }

    /// Make the next `count` receipt lookups for `tx_hash` return an RPC error
    pub fn fail_receipt_lookups(&self, tx_hash: TxHash, count: usize) {
        self.state
            .lock()
            .unwrap()
            .receipt_failures
            .insert(tx_hash, count);
    }

    /// Report receipts of transactions sent to `target` as not yet mined for
    /// the first `polls` lookups
    pub fn delay_receipts_for(&self, target: Address, polls: usize) {
        self.state
            .lock()
            .unwrap()
            .target_receipt_delays
            .insert(target, polls);
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((token, owner), amount);
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn set_owner(&self, contract: Address, owner: Address) {
        self.state.lock().unwrap().owners.insert(contract, owner);
    }

    /// Deploy bytecode at `address`, turning it into a contract account
    pub fn set_code(&self, address: Address, code: Bytes) {
        self.state.lock().unwrap().code.insert(address, code);
    }

    /// Attach `logs` to the receipt of every transaction sent to `target`
    pub fn emit_logs_for(&self, target: Address, logs: Vec<Log>) {
        self.state.lock().unwrap().target_logs.insert(target, logs);
    }

    /// Mine the next sent transaction with a failed status
    pub fn revert_next_transaction(&self) {
        self.state.lock().unwrap().revert_next = true;
    }

    /// Reject the next send with `message`, classified like a real wallet error
    pub fn fail_next_send(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .send_failures
            .push_back(message.into());
    }

    /// Every transaction accepted by [`ChainClient::send_transaction`], in order
    pub fn sent_transactions(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Targets of every sent transaction, in order
    pub fn sent_targets(&self) -> Vec<Option<Address>> {
        self.sent_transactions().iter().map(target_of).collect()
    }
}

fn target_of(tx: &TransactionRequest) -> Option<Address> {
    match tx.to {
        Some(TxKind::Call(address)) => Some(address),
        _ => None,
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<ReceiptSummary>> {
        let mut state = self.state.lock().unwrap();

        if let Some(remaining) = state.receipt_failures.get_mut(&tx_hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(OffsetZapError::Provider("Simulated RPC error".to_string()));
            }
        }

        if let Some(remaining) = state.pending_polls.get_mut(&tx_hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }

        Ok(state.receipts.get(&tx_hash).cloned())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();

        if let Some(message) = state.send_failures.pop_front() {
            return Err(classify_provider_error(message));
        }

        let nonce = state.sent.len() as u64 + 1;
        let mut seed = [0u8; 16];
        seed[..8].copy_from_slice(&self.chain_id.to_be_bytes());
        seed[8..].copy_from_slice(&nonce.to_be_bytes());
        let tx_hash = TxHash::left_padding_from(&seed);

        let target = target_of(&tx);
        let logs = target
            .and_then(|target| state.target_logs.get(&target).cloned())
            .unwrap_or_default();
        let receipt_delay =
            target.and_then(|target| state.target_receipt_delays.get(&target).copied());
        if let Some(polls) = receipt_delay {
            state.pending_polls.insert(tx_hash, polls);
        }
        let success = !std::mem::take(&mut state.revert_next);

        state.receipts.insert(
            tx_hash,
            ReceiptSummary {
                transaction_hash: tx_hash,
                block_number: Some(12345 + nonce),
                success,
                logs: if success { logs } else { Vec::new() },
            },
        );
        state.sent.push(tx);
        Ok(tx_hash)
    }

    async fn token_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn contract_owner(&self, contract: Address) -> Result<Address> {
        self.state
            .lock()
            .unwrap()
            .owners
            .get(&contract)
            .copied()
            .ok_or_else(|| OffsetZapError::ContractCall(format!("{contract} is not Ownable")))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .code
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Fake Quote Provider
// ============================================================================

/// A fake quote provider returning a fixed quote, or failing on demand.
///
/// Quotes queued with [`push_quote`](Self::push_quote) are served in order;
/// the last one repeats.
#[derive(Clone, Debug)]
pub struct FakeQuoteProvider {
    quotes: Arc<Mutex<Vec<Quote>>>,
    calls: Arc<Mutex<usize>>,
}

impl FakeQuoteProvider {
    pub fn new(quote: Quote) -> Self {
        Self {
            quotes: Arc::new(Mutex::new(vec![quote])),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A provider for which every route is unavailable
    pub fn unavailable() -> Self {
        Self {
            quotes: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Replace every queued quote with `quote`
    pub fn set_quote(&self, quote: Quote) {
        *self.quotes.lock().unwrap() = vec![quote];
    }

    /// Serve `quote` after the ones already queued
    pub fn push_quote(&self, quote: Quote) {
        self.quotes.lock().unwrap().push(quote);
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl QuoteProvider for FakeQuoteProvider {
    async fn get_quote(&self, _request: &RetirementRequest) -> Result<Quote> {
        let quotes = self.quotes.lock().unwrap();
        let mut calls = self.calls.lock().unwrap();
        let index = (*calls).min(quotes.len().saturating_sub(1));
        *calls += 1;

        quotes
            .get(index)
            .cloned()
            .ok_or_else(|| OffsetZapError::QuoteUnavailable {
                reason: "Simulated unsupported route".to_string(),
            })
    }
}

// ============================================================================
// Fake Deposit Status Provider
// ============================================================================

#[derive(Clone, Debug)]
enum StatusReply {
    Response(DepositStatusResponse),
    RateLimited(u64),
    Error,
}

/// A fake Across deposit status API.
///
/// Each call returns the next reply in the sequence; the last one repeats.
/// With no replies configured every call reports the deposit as pending.
///
/// This allows testing scenarios like:
/// - Pending → Filled progression
/// - Expired and refunded deposits
/// - Rate limiting (429)
/// - Transient API errors
#[derive(Clone, Debug, Default)]
pub struct FakeDepositStatusProvider {
    replies: Arc<Mutex<Vec<StatusReply>>>,
    calls: Arc<Mutex<usize>>,
}

impl FakeDepositStatusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a sequence of responses
    pub fn with_responses(responses: Vec<DepositStatusResponse>) -> Self {
        let provider = Self::new();
        for response in responses {
            provider.push_response(response);
        }
        provider
    }

    pub fn push_response(&self, response: DepositStatusResponse) {
        self.replies
            .lock()
            .unwrap()
            .push(StatusReply::Response(response));
    }

    /// Queue a 429 carrying `retry_after_seconds`
    pub fn push_rate_limited(&self, retry_after_seconds: u64) {
        self.replies
            .lock()
            .unwrap()
            .push(StatusReply::RateLimited(retry_after_seconds));
    }

    /// Queue a transient API failure
    pub fn push_error(&self) {
        self.replies.lock().unwrap().push(StatusReply::Error);
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DepositStatusProvider for FakeDepositStatusProvider {
    async fn get_deposit_status(
        &self,
        _origin_chain_id: u64,
        _deposit_id: u32,
    ) -> Result<DepositStatusResponse> {
        let replies = self.replies.lock().unwrap();
        let mut calls = self.calls.lock().unwrap();
        let index = (*calls).min(replies.len().saturating_sub(1));
        *calls += 1;

        match replies.get(index).cloned() {
            None => Ok(DepositStatusResponse::pending()),
            Some(StatusReply::Response(response)) => Ok(response),
            Some(StatusReply::RateLimited(retry_after_seconds)) => {
                Err(OffsetZapError::RateLimitExceeded {
                    retry_after_seconds,
                })
            }
            Some(StatusReply::Error) => Err(OffsetZapError::Monitoring(
                "Simulated deposit status error".to_string(),
            )),
        }
    }
}

// ============================================================================
// Fake Notification Relay
// ============================================================================

/// A fake relay that records everything it is asked to deliver.
#[derive(Clone, Debug, Default)]
pub struct FakeNotificationRelay {
    notifications: Arc<Mutex<Vec<RetirementNotification>>>,
    messages: Arc<Mutex<Vec<(Address, String)>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeNotificationRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// A relay that rejects every request
    pub fn failing() -> Self {
        let relay = Self::default();
        *relay.failing.lock().unwrap() = true;
        relay
    }

    pub fn notifications(&self) -> Vec<RetirementNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(Address, String)> {
        self.messages.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(OffsetZapError::NotificationFailed(
                "Simulated relay outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationRelay for FakeNotificationRelay {
    async fn send(&self, recipient: Address, message: &str) -> Result<()> {
        self.check()?;
        self.messages
            .lock()
            .unwrap()
            .push((recipient, message.to_string()));
        Ok(())
    }

    async fn notify_retirement(&self, notification: &RetirementNotification) -> Result<()> {
        self.check()?;
        self.notifications
            .lock()
            .unwrap()
            .push(notification.clone());
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        self.check()
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
///
/// This enables testing fill deadlines and quote expiry without actually
/// waiting. Unix time starts at a fixed point and moves with the clock.
#[derive(Clone, Debug)]
pub struct FakeClock {
    start: Instant,
    start_unix: u64,
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        let start_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::at_unix(start_unix)
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose unix time starts at `start_unix`
    pub fn at_unix(start_unix: u64) -> Self {
        let start = Instant::now();
        Self {
            start,
            start_unix,
            current_time: Arc::new(Mutex::new(start)),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }

    /// Clear the sleep log
    pub fn clear_sleep_log(&self) {
        self.sleep_log.lock().unwrap().clear();
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }

    fn unix_now(&self) -> u64 {
        self.start_unix + (self.now() - self.start).as_secs()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const DEPOSITOR: Address = address!("1111111111111111111111111111111111111111");
pub const BENEFICIARY: Address = address!("2222222222222222222222222222222222222222");

/// Base → Polygon, 10 USDC, retired into BCT for "Green Corp"
pub fn sample_request() -> RetirementRequest {
    RetirementRequest::builder()
        .origin_chain(NamedChain::Base)
        .destination_chain(NamedChain::Polygon)
        .input_amount(U256::from(10_000_000u64))
        .depositor(DEPOSITOR)
        .beneficiary(BENEFICIARY)
        .beneficiary_name("Green Corp")
        .pool_token(PoolToken::Bct)
        .retirement_message("Offsetting our 2025 travel")
        .build()
        .unwrap()
}

/// A Base SpokePool quote for 10 USDC in, 9.95 USDC out, taken at `quote_timestamp`
pub fn sample_quote(quote_timestamp: u64) -> Quote {
    Quote {
        deposit: DepositParams {
            spoke_pool: BASE_SPOKE_POOL_ADDRESS,
            exclusive_relayer: Address::ZERO,
            exclusivity_deadline: 0,
            quote_timestamp: quote_timestamp as u32,
            fill_deadline: (quote_timestamp + 21_600) as u32,
        },
        input_amount: U256::from(10_000_000u64),
        output_amount: U256::from(9_950_000u64),
        fees: RelayFees {
            total_relay_fee: U256::from(50_000u64),
            total_relay_fee_pct: U256::from(5_000_000_000_000_000u64),
            lp_fee: U256::from(10_000u64),
            relayer_capital_fee: U256::from(15_000u64),
            relayer_gas_fee: U256::from(25_000u64),
        },
        estimated_fill_time_sec: 10,
    }
}

/// A `V3FundsDeposited` log as emitted by `spoke_pool`
pub fn funds_deposited_log(
    spoke_pool: Address,
    deposit_id: u32,
    depositor: Address,
    destination_chain_id: u64,
) -> Log {
    let event = V3FundsDeposited {
        inputToken: Address::repeat_byte(0xaa),
        outputToken: Address::repeat_byte(0xbb),
        inputAmount: U256::from(10_000_000u64),
        outputAmount: U256::from(9_950_000u64),
        destinationChainId: U256::from(destination_chain_id),
        depositId: deposit_id,
        quoteTimestamp: 1_700_000_000,
        fillDeadline: 1_700_021_600,
        exclusivityDeadline: 0,
        depositor,
        recipient: Address::repeat_byte(0xcc),
        exclusiveRelayer: Address::ZERO,
        message: Bytes::new(),
    };
    Log {
        address: spoke_pool,
        data: event.encode_log_data(),
    }
}

/// A `FilledV3Relay` log as emitted by the destination `spoke_pool`
pub fn filled_relay_log(spoke_pool: Address, deposit_id: u32, origin_chain_id: u64) -> Log {
    let event = FilledV3Relay {
        inputToken: Address::repeat_byte(0xaa),
        outputToken: Address::repeat_byte(0xbb),
        inputAmount: U256::from(10_000_000u64),
        outputAmount: U256::from(9_950_000u64),
        repaymentChainId: U256::from(origin_chain_id),
        originChainId: U256::from(origin_chain_id),
        depositId: deposit_id,
        fillDeadline: 1_700_021_600,
        exclusivityDeadline: 0,
        exclusiveRelayer: Address::ZERO,
        relayer: Address::repeat_byte(0xdd),
        depositor: DEPOSITOR,
        recipient: Address::repeat_byte(0xcc),
        message: Bytes::new(),
        relayExecutionInfo: V3RelayExecutionEventInfo {
            updatedRecipient: Address::repeat_byte(0xcc),
            updatedMessage: Bytes::new(),
            updatedOutputAmount: U256::from(9_950_000u64),
            fillType: FillType::FastFill,
        },
    };
    Log {
        address: spoke_pool,
        data: event.encode_log_data(),
    }
}

/// A v3.5 `FundsDeposited` log, with `bytes32` addresses and a `uint256` id
pub fn bytes32_funds_deposited_log(
    spoke_pool: Address,
    deposit_id: u32,
    depositor: Address,
    destination_chain_id: u64,
) -> Log {
    let event = FundsDeposited {
        inputToken: Address::repeat_byte(0xaa).into_word(),
        outputToken: Address::repeat_byte(0xbb).into_word(),
        inputAmount: U256::from(10_000_000u64),
        outputAmount: U256::from(9_950_000u64),
        destinationChainId: U256::from(destination_chain_id),
        depositId: U256::from(deposit_id),
        quoteTimestamp: 1_700_000_000,
        fillDeadline: 1_700_021_600,
        exclusivityDeadline: 0,
        depositor: depositor.into_word(),
        recipient: Address::repeat_byte(0xcc).into_word(),
        exclusiveRelayer: Address::ZERO.into_word(),
        message: Bytes::new(),
    };
    Log {
        address: spoke_pool,
        data: event.encode_log_data(),
    }
}

/// A v3.5 `FilledRelay` log as emitted by the destination `spoke_pool`
pub fn bytes32_filled_relay_log(spoke_pool: Address, deposit_id: u32, origin_chain_id: u64) -> Log {
    let event = FilledRelay {
        inputToken: Address::repeat_byte(0xaa).into_word(),
        outputToken: Address::repeat_byte(0xbb).into_word(),
        inputAmount: U256::from(10_000_000u64),
        outputAmount: U256::from(9_950_000u64),
        repaymentChainId: U256::from(origin_chain_id),
        originChainId: U256::from(origin_chain_id),
        depositId: U256::from(deposit_id),
        fillDeadline: 1_700_021_600,
        exclusivityDeadline: 0,
        exclusiveRelayer: Address::ZERO.into_word(),
        relayer: Address::repeat_byte(0xdd).into_word(),
        depositor: DEPOSITOR.into_word(),
        recipient: Address::repeat_byte(0xcc).into_word(),
        messageHash: B256::ZERO,
        relayExecutionInfo: RelayExecutionEventInfo {
            updatedRecipient: Address::repeat_byte(0xcc).into_word(),
            updatedMessageHash: B256::ZERO,
            updatedOutputAmount: U256::from(9_950_000u64),
            fillType: FillType::FastFill,
        },
    };
    Log {
        address: spoke_pool,
        data: event.encode_log_data(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepositStatus;

    #[tokio::test]
    async fn test_fake_clock_tracks_sleep_calls() {
        let clock = FakeClock::at_unix(1_000);

        clock.sleep(Duration::from_secs(60)).await;
        clock.sleep(Duration::from_secs(120)).await;

        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(180));
        assert_eq!(clock.unix_now(), 1_180);
    }

    #[tokio::test]
    async fn test_fake_status_provider_sequence_repeats_last() {
        let provider = FakeDepositStatusProvider::with_responses(vec![
            DepositStatusResponse::pending(),
            DepositStatusResponse::filled(TxHash::from([1u8; 32])),
        ]);

        let first = provider.get_deposit_status(8453, 1).await.unwrap();
        assert_eq!(first.status, DepositStatus::Pending);

        for _ in 0..3 {
            let next = provider.get_deposit_status(8453, 1).await.unwrap();
            assert_eq!(next.status, DepositStatus::Filled);
        }
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_fake_status_provider_rate_limit() {
        let provider = FakeDepositStatusProvider::new();
        provider.push_rate_limited(30);
        provider.push_response(DepositStatusResponse::pending());

        let result = provider.get_deposit_status(8453, 1).await;
        assert!(matches!(
            result,
            Err(OffsetZapError::RateLimitExceeded {
                retry_after_seconds: 30
            })
        ));
        assert!(provider.get_deposit_status(8453, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_fake_chain_client_send_failure_is_classified() {
        let client = FakeChainClient::new(8453);
        client.fail_next_send("User denied transaction signature");

        let result = client.send_transaction(TransactionRequest::default()).await;
        assert!(matches!(result, Err(OffsetZapError::UserRejected)));
        assert!(client.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_fake_chain_client_mines_sent_transactions() {
        let client = FakeChainClient::new(8453);
        client.revert_next_transaction();

        let reverted = client
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap();
        let mined = client
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap();

        assert_ne!(reverted, mined);
        let receipt = client.get_transaction_receipt(reverted).await.unwrap().unwrap();
        assert!(!receipt.success);
        let receipt = client.get_transaction_receipt(mined).await.unwrap().unwrap();
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn test_fake_chain_client_delays_receipts_per_target() {
        let client = FakeChainClient::new(8453);
        let slow = Address::repeat_byte(0x5a);
        client.delay_receipts_for(slow, 2);

        let tx = TransactionRequest::default().to(slow);
        let tx_hash = client.send_transaction(tx).await.unwrap();

        assert!(client.get_transaction_receipt(tx_hash).await.unwrap().is_none());
        assert!(client.get_transaction_receipt(tx_hash).await.unwrap().is_none());
        assert!(client.get_transaction_receipt(tx_hash).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fake_quote_provider_serves_queue_then_repeats() {
        let provider = FakeQuoteProvider::new(sample_quote(100));
        provider.push_quote(sample_quote(200));

        let request = sample_request();
        assert_eq!(provider.get_quote(&request).await.unwrap().quote_timestamp(), 100);
        assert_eq!(provider.get_quote(&request).await.unwrap().quote_timestamp(), 200);
        assert_eq!(provider.get_quote(&request).await.unwrap().quote_timestamp(), 200);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fake_relay_failing() {
        let relay = FakeNotificationRelay::failing();
        assert!(matches!(
            relay.health().await,
            Err(OffsetZapError::NotificationFailed(_))
        ));
    }
}
