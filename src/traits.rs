//! Core trait abstractions for the retirement pipeline.
//!
//! Every external system the pipeline talks to sits behind one of these
//! traits: the origin and destination chains, the Across quote and deposit
//! status APIs, the notification relay, and time itself. Production
//! implementations live in [`crate::providers`]; fakes for tests live in
//! [`crate::testing`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use offsetzap_rs::traits::QuoteProvider;
//! use offsetzap_rs::{Quote, RetirementRequest, Result};
//!
//! struct FixedQuote(Quote);
//!
//! #[async_trait::async_trait]
//! impl QuoteProvider for FixedQuote {
//!     async fn get_quote(&self, _request: &RetirementRequest) -> Result<Quote> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::protocol::{
    DepositStatusResponse, Quote, ReceiptSummary, RetirementNotification, RetirementRequest,
};

/// Trait for chain RPC operations.
///
/// One instance per chain: the pipeline holds an origin client (approve,
/// deposit) and a destination client (fill receipts, beneficiary checks,
/// Facilitator administration).
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Reverted approvals and deposits
/// - Receipts that never appear
/// - Wallet rejections and nonce conflicts on send
/// - Contract beneficiaries
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// EIP-155 chain id this client is connected to
    fn chain_id(&self) -> u64;

    /// Fetches the receipt of a transaction.
    ///
    /// Returns `None` if the transaction is not found or not yet mined.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<ReceiptSummary>>;

    /// Signs and broadcasts a transaction, returning its hash.
    ///
    /// # Errors
    ///
    /// Wallet and node errors are classified with
    /// [`classify_provider_error`](crate::classify_provider_error), so a
    /// rejected signature surfaces as [`UserRejected`](crate::OffsetZapError::UserRejected).
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// ERC-20 allowance `owner` has granted `spender` on `token`
    async fn token_allowance(&self, token: Address, owner: Address, spender: Address)
        -> Result<U256>;

    /// ERC-20 balance of `owner` on `token`
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    /// `owner()` of an Ownable contract
    async fn contract_owner(&self, contract: Address) -> Result<Address>;

    /// Deployed bytecode at `address`, empty for externally owned accounts
    async fn get_code(&self, address: Address) -> Result<Bytes>;
}

/// Trait for bridge fee quotes.
///
/// # Test Scenarios
///
/// - Amount too low for the route
/// - Rate limiting (429 responses)
/// - Quotes that expire before the deposit is sent
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches a fee-adjusted quote for bridging the request's input amount.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteUnavailable`](crate::OffsetZapError::QuoteUnavailable)
    /// when the route cannot be quoted, and
    /// [`RateLimitExceeded`](crate::OffsetZapError::RateLimitExceeded) on 429.
    async fn get_quote(&self, request: &RetirementRequest) -> Result<Quote>;
}

/// Trait for observing deposit fills through the Across API.
///
/// Status responses are a monitoring signal only; the pipeline confirms any
/// reported fill against the destination chain before acting on it.
#[async_trait]
pub trait DepositStatusProvider: Send + Sync {
    async fn get_deposit_status(
        &self,
        origin_chain_id: u64,
        deposit_id: u32,
    ) -> Result<DepositStatusResponse>;
}

/// Trait for the notification relay that forwards messages to the
/// beneficiary's wallet inbox.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    /// Sends a free-form message to `recipient`
    async fn send(&self, recipient: Address, message: &str) -> Result<()>;

    /// Sends one of the fixed retirement status notifications
    async fn notify_retirement(&self, notification: &RetirementNotification) -> Result<()>;

    /// Checks that the relay is reachable
    async fn health(&self) -> Result<()>;
}

/// Trait for time-based operations.
///
/// This trait abstracts sleep and time queries, enabling fast-forward testing
/// where tests can instantly advance through polling loops and timeouts without
/// actually waiting.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Fill deadlines without waiting
/// - Polling interval correctness
/// - Rate limit backoff periods
/// - Quote expiry
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Returns the current instant in time.
    ///
    /// Used for calculating timeouts and measuring elapsed time.
    fn now(&self) -> Instant;

    /// Seconds since the unix epoch, used for quote timestamps and history records.
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}
