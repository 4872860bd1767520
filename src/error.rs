// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OffsetZapError {
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(NamedChain),

    #[error("Chain {chain} has no {role} configured")]
    MissingContract { chain: NamedChain, role: &'static str },

    #[error("Invalid retirement request: {0}")]
    InvalidRequest(String),

    #[error("Invalid beneficiary {address}: {reason}")]
    InvalidBeneficiary { address: Address, reason: String },

    #[error("Unknown pool token: {0}")]
    UnknownPoolToken(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Quote unavailable: {reason}")]
    QuoteUnavailable { reason: String },

    #[error("Quote expired: quoted at {quote_timestamp}, now {now}")]
    QuoteExpired { quote_timestamp: u64, now: u64 },

    #[error("Encoded message was built for {encoded} but the deposit carries {expected}")]
    StaleMessage { encoded: U256, expected: U256 },

    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("User rejected the transaction signature")]
    UserRejected,

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Nonce conflict: {0}")]
    NonceConflict(String),

    #[error("Transaction {tx_hash} reverted during {step}")]
    TransactionReverted { tx_hash: TxHash, step: &'static str },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Timeout waiting for receipt of {tx_hash}")]
    ReceiptTimeout { tx_hash: TxHash },

    #[error("Fill monitoring failed: {0}")]
    Monitoring(String),

    #[error("Deposit {deposit_tx} was broadcast but its outcome is unknown ({reason}); check the explorer before retrying")]
    DepositUnconfirmed { deposit_tx: TxHash, reason: String },

    #[error("Deposit {deposit_id} was not filled: {reason}")]
    FillFailed { deposit_id: u32, reason: String },

    #[error("Deposit {deposit_id} (tx {deposit_tx}) not filled before the deadline; check the explorer manually")]
    FillDeadlineExceeded { deposit_id: u32, deposit_tx: TxHash },

    #[error("{caller} is not the owner ({owner}) of {contract}")]
    NotOwner {
        caller: Address,
        owner: Address,
        contract: Address,
    },

    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OffsetZapError {
    /// Returns true when the error happened before any funds could have left
    /// the origin chain, so the request can be re-quoted from scratch.
    pub fn is_fatal_before_deposit(&self) -> bool {
        !matches!(
            self,
            Self::Monitoring(_)
                | Self::DepositUnconfirmed { .. }
                | Self::FillFailed { .. }
                | Self::FillDeadlineExceeded { .. }
                | Self::NotificationFailed(_)
        )
    }

    /// Returns true for errors that say nothing about whether funds moved,
    /// only that the client lost track of them.
    pub fn is_monitoring(&self) -> bool {
        matches!(
            self,
            Self::Monitoring(_)
                | Self::DepositUnconfirmed { .. }
                | Self::FillDeadlineExceeded { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

/// Maps a raw wallet or RPC error message onto the taxonomy above.
///
/// Wallets and nodes only report these conditions as free-form strings, so the
/// match is on well-known fragments (EIP-1193 code 4001, geth/reth wording).
pub fn classify_provider_error(message: impl Into<String>) -> OffsetZapError {
    let message = message.into();
    let lower = message.to_ascii_lowercase();

    if lower.contains("user rejected")
        || lower.contains("user denied")
        || lower.contains("code: 4001")
        || lower.contains("code 4001")
    {
        OffsetZapError::UserRejected
    } else if lower.contains("insufficient funds") || lower.contains("exceeds balance") {
        OffsetZapError::InsufficientFunds(message)
    } else if lower.contains("nonce too low")
        || lower.contains("nonce too high")
        || lower.contains("replacement transaction underpriced")
        || lower.contains("already known")
    {
        OffsetZapError::NonceConflict(message)
    } else if lower.contains("429") || lower.contains("rate limit") {
        OffsetZapError::RateLimitExceeded {
            retry_after_seconds: 60,
        }
    } else {
        OffsetZapError::Provider(message)
    }
}

pub type Result<T> = std::result::Result<T, OffsetZapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("MetaMask Tx Signature: User denied transaction signature.")]
    #[case("server returned an error response: error code 4001: User rejected the request.")]
    fn test_classifies_user_rejection(#[case] message: &str) {
        assert!(matches!(
            classify_provider_error(message),
            OffsetZapError::UserRejected
        ));
    }

    #[rstest]
    #[case("insufficient funds for gas * price + value")]
    #[case("execution reverted: ERC20: transfer amount exceeds balance")]
    fn test_classifies_insufficient_funds(#[case] message: &str) {
        assert!(matches!(
            classify_provider_error(message),
            OffsetZapError::InsufficientFunds(_)
        ));
    }

    #[rstest]
    #[case("nonce too low: next nonce 12, tx nonce 11")]
    #[case("replacement transaction underpriced")]
    fn test_classifies_nonce_conflicts(#[case] message: &str) {
        assert!(matches!(
            classify_provider_error(message),
            OffsetZapError::NonceConflict(_)
        ));
    }

    #[test]
    fn test_classifies_rate_limit() {
        assert!(matches!(
            classify_provider_error("HTTP error 429 Too Many Requests"),
            OffsetZapError::RateLimitExceeded { .. }
        ));
    }

    #[test]
    fn test_unknown_errors_stay_provider_errors() {
        let err = classify_provider_error("connection reset by peer");
        assert!(matches!(err, OffsetZapError::Provider(ref m) if m == "connection reset by peer"));
    }

    #[test]
    fn test_monitoring_errors_are_not_fatal_before_deposit() {
        let err = OffsetZapError::FillDeadlineExceeded {
            deposit_id: 7,
            deposit_tx: TxHash::ZERO,
        };
        assert!(!err.is_fatal_before_deposit());
        assert!(err.is_monitoring());

        let err = OffsetZapError::UserRejected;
        assert!(err.is_fatal_before_deposit());
        assert!(!err.is_monitoring());
    }

    #[test]
    fn test_unconfirmed_deposit_is_not_fatal_before_deposit() {
        let err = OffsetZapError::DepositUnconfirmed {
            deposit_tx: TxHash::repeat_byte(0xde),
            reason: "no receipt".to_string(),
        };
        assert!(!err.is_fatal_before_deposit());
        assert!(err.is_monitoring());
        assert!(err.to_string().contains(&TxHash::repeat_byte(0xde).to_string()));
    }
}
