//! # offsetzap-rs
//!
//! A Rust SDK for paying for carbon retirement on one chain and settling it
//! on another.
//!
//! A user pays in USDC on Base (or another supported origin chain). The funds
//! are bridged to Polygon with an Across Protocol `depositV3` whose message
//! instructs the Across multicall handler to hand the bridged USDC to the
//! Facilitator contract, which swaps into a Toucan carbon pool token and
//! retires it on behalf of the beneficiary. Progress is pushed to the
//! beneficiary's wallet inbox through an HTTP notification relay.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use offsetzap_rs::providers::{
//!     AcrossApiProvider, AlloyChainClient, CachedQuoteProvider, HttpNotificationRelay, TokioClock,
//! };
//! use offsetzap_rs::{OffsetZapConfig, PoolToken, RetirementPipeline, RetirementRequest};
//! use alloy_chains::NamedChain;
//! use alloy_primitives::{address, U256};
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OffsetZapConfig::from_env()?;
//! let base = ProviderBuilder::new().connect(config.origin_rpc_url.as_str()).await?;
//! let polygon = ProviderBuilder::new().connect(config.destination_rpc_url.as_str()).await?;
//! let across =
//!     AcrossApiProvider::new(config.across_api_url.as_str()).with_facilitator(config.facilitator);
//!
//! let pipeline = RetirementPipeline::builder()
//!     .origin(AlloyChainClient::new(base, NamedChain::Base))
//!     .destination(AlloyChainClient::new(polygon, NamedChain::Polygon))
//!     .quotes(CachedQuoteProvider::new(across.clone(), TokioClock::new()))
//!     .deposit_status(across)
//!     .notifier(HttpNotificationRelay::new(config.notification_url.as_str()))
//!     .clock(TokioClock::new())
//!     .facilitator(config.facilitator)
//!     .maybe_history_path(config.history_path)
//!     .build();
//!
//! let request = RetirementRequest::builder()
//!     .origin_chain(NamedChain::Base)
//!     .destination_chain(NamedChain::Polygon)
//!     .input_amount(U256::from(10_000_000u64))
//!     .depositor(address!("1111111111111111111111111111111111111111"))
//!     .beneficiary(address!("2222222222222222222222222222222222222222"))
//!     .beneficiary_name("Green Corp")
//!     .pool_token(PoolToken::Bct)
//!     .build()?;
//!
//! let outcome = pipeline.execute(&request, None).await?;
//! println!("deposit {} ended {:?}", outcome.deposit_id, outcome.state);
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`RetirementRequest`], [`Quote`] and [`EncodedMessage`] - what is paid, at what fee, with which instructions
//! - [`RetirementPipeline`] - quote, approve, deposit, await fill, notify
//! - [`FacilitatorAdmin`] - owner-only withdrawals from the Facilitator
//! - [`traits`] - seams for chains, the Across API, the relay and time
//! - [`providers`] - production implementations of those seams
//! - [`testing`] - fakes for tests
//! - [`OffsetZapError`] and [`Result`] - error types for error handling

mod chain;
mod config;
mod error;
mod pipeline;
mod protocol;

pub mod contracts;
pub mod providers;
pub mod testing;
pub mod traits;

// Public module for advanced users who need custom instrumentation
pub mod spans;

pub use chain::addresses;
pub use chain::AcrossChain;
pub use config::OffsetZapConfig;
pub use error::{classify_provider_error, OffsetZapError, Result};
pub use pipeline::{
    wait_for_receipt, DepositReceipt, FacilitatorAdmin, PollingConfig, ProgressTracker,
    RetirementOutcome, RetirementPipeline, TokenState,
};
pub use protocol::{
    encode_deposit_message, DepositParams, DepositStatus, DepositStatusResponse, EncodedMessage,
    PipelineState, PoolToken, ProgressEvent, ProgressStep, Quote, ReceiptSummary, RelayFees,
    RetirementIntent, RetirementNotification, RetirementRequest, RetirementStatus,
    SendMessageRequest, SuggestedFeesResponse, TransactionHistory, TransactionRecord, TxStatus,
    DEFAULT_FILL_DEADLINE_SECS, MAX_BENEFICIARY_NAME_LEN, MAX_RETIREMENT_MESSAGE_LEN,
    QUOTE_VALIDITY_SECS,
};
pub use traits::{ChainClient, Clock, DepositStatusProvider, NotificationRelay, QuoteProvider};
