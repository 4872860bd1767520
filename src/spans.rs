//! OpenTelemetry span helpers for retirement operations
//!
//! Static span names and structured attributes, kept out of the business
//! logic. The pipeline uses these internally; they are public for callers who
//! drive individual steps themselves or integrate with an existing
//! OpenTelemetry setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use offsetzap_rs::spans;
//! use tracing::Instrument;
//!
//! # async fn example() {
//! let span = spans::await_fill(4242, 8453, 120, 15);
//! async {
//!     // Your custom fill monitoring here
//! }
//! .instrument(span)
//! .await;
//! # }
//! ```

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;
use url::Url;

use crate::protocol::RetirementStatus;

/// Create span for a full retirement run.
///
/// Parent: Caller's span
/// Children: every other span in this module
#[inline]
pub fn execute_retirement(
    origin_chain: &NamedChain,
    destination_chain: &NamedChain,
    input_amount: &U256,
    beneficiary: &Address,
) -> Span {
    tracing::info_span!(
        "offsetzap.execute_retirement",
        origin_chain = %origin_chain,
        destination_chain = %destination_chain,
        input_amount = %input_amount,
        beneficiary = %beneficiary,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for fetching and validating a bridge quote.
///
/// Parent: offsetzap.execute_retirement
/// Children: HTTP client request spans
#[inline]
pub fn get_quote(
    origin_chain: &NamedChain,
    destination_chain: &NamedChain,
    input_amount: &U256,
) -> Span {
    tracing::info_span!(
        "offsetzap.get_quote",
        origin_chain = %origin_chain,
        destination_chain = %destination_chain,
        input_amount = %input_amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for `depositV3` transaction creation.
///
/// Parent: offsetzap.execute_retirement
/// Children: None
#[inline]
pub fn deposit_v3(
    depositor: &Address,
    recipient: &Address,
    destination_chain_id: u64,
    input_token: &Address,
    input_amount: &U256,
) -> Span {
    tracing::info_span!(
        "offsetzap.deposit_v3",
        depositor = %depositor,
        recipient = %recipient,
        destination_chain_id = destination_chain_id,
        input_token = %input_token,
        input_amount = %input_amount,
    )
}

/// Create span for transaction submission to a chain.
///
/// Parent: Step span (approve, deposit, withdrawal)
/// Children: Provider RPC calls
#[inline]
pub fn send_transaction(tx_hash: TxHash, chain: &NamedChain) -> Span {
    tracing::debug_span!(
        "offsetzap.send_transaction",
        tx_hash = %tx_hash,
        chain = %chain,
    )
}

/// Create span for polling a transaction receipt.
///
/// Parent: Step span
/// Children: Provider RPC calls (polling)
#[inline]
pub fn wait_for_receipt(tx_hash: TxHash, chain_id: u64, max_attempts: u32) -> Span {
    tracing::debug_span!(
        "offsetzap.wait_for_receipt",
        tx_hash = %tx_hash,
        chain_id = chain_id,
        max_attempts = max_attempts,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for waiting on a relayer fill.
///
/// Parent: offsetzap.execute_retirement
/// Children: Deposit status API requests, destination receipt lookups
#[inline]
pub fn await_fill(
    deposit_id: u32,
    origin_chain_id: u64,
    max_attempts: u32,
    poll_interval_secs: u64,
) -> Span {
    tracing::info_span!(
        "offsetzap.await_fill",
        deposit_id = deposit_id,
        origin_chain_id = origin_chain_id,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for a relay notification.
#[inline]
pub fn notify(status: RetirementStatus, deposit_id: u32) -> Span {
    tracing::debug_span!(
        "offsetzap.notify",
        status = %status,
        request_id = deposit_id,
    )
}

/// Create span for an owner-only Facilitator withdrawal.
///
/// `token` is `None` for native token withdrawals.
#[inline]
pub fn facilitator_withdrawal(
    facilitator: &Address,
    caller: &Address,
    token: Option<&Address>,
    amount: &U256,
) -> Span {
    tracing::info_span!(
        "offsetzap.facilitator_withdrawal",
        facilitator = %facilitator,
        caller = %caller,
        token = token.map(tracing::field::display),
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for HTTP request to the Across API.
///
/// Parent: offsetzap.get_quote or offsetzap.await_fill
/// Children: None (HTTP client handles internal spans)
#[inline]
pub fn http_request(method: &str, url: &Url) -> Span {
    tracing::trace_span!(
        "offsetzap.http_request",
        http.method = method,
        http.url = %url,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.source: The underlying error, if any
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use offsetzap_rs::spans;
///
/// let span = tracing::info_span!("offsetzap.operation");
/// let _guard = span.enter();
///
/// spans::record_error_with_context(
///     "FillDeadlineExceeded",
///     "No fill confirmed for deposit 4242",
///     Some("Check the deposit on the origin chain explorer"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OffsetZapError;

    #[test]
    fn test_error_recording_inside_span() {
        let _subscriber = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_env_filter("trace")
                .with_test_writer()
                .finish(),
        );

        let span = await_fill(1, 8453, 3, 1);
        let _guard = span.enter();
        record_error(&OffsetZapError::FillDeadlineExceeded {
            deposit_id: 1,
            deposit_tx: TxHash::ZERO,
        });
        record_error_with_context("Timeout", "no fill", Some("3 attempts"));

        assert_eq!(span.metadata().map(|m| m.name()), Some("offsetzap.await_fill"));
    }
}
