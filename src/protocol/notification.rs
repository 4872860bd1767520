//! Notification relay payloads and message templates

use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OffsetZapError, Result};

/// Lifecycle status reported to the beneficiary's wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetirementStatus {
    Initiated,
    Completed,
    Failed,
}

impl fmt::Display for RetirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initiated => "initiated",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Body of `POST /api/notify/retirement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementNotification {
    pub recipient_address: Address,
    pub request_id: String,
    /// Human-readable amount, already scaled by the token's decimals
    pub amount: String,
    pub token_symbol: String,
    pub status: RetirementStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
}

impl RetirementNotification {
    /// Builds a notification, formatting `amount` with `decimals`
    pub fn new(
        recipient_address: Address,
        request_id: impl Into<String>,
        amount: U256,
        decimals: u8,
        token_symbol: impl Into<String>,
        status: RetirementStatus,
        transaction_hash: Option<TxHash>,
    ) -> Result<Self> {
        Ok(Self {
            recipient_address,
            request_id: request_id.into(),
            amount: format_token_amount(amount, decimals)?,
            token_symbol: token_symbol.into(),
            status,
            transaction_hash,
        })
    }

    /// The fixed message body for this notification's status
    pub fn render(&self) -> String {
        let tx = self
            .transaction_hash
            .map(|hash| format!(" Transaction: {hash}"))
            .unwrap_or_default();

        match self.status {
            RetirementStatus::Initiated => format!(
                "Your carbon retirement request #{} for {} {} has been initiated and is being bridged.{tx}",
                self.request_id, self.amount, self.token_symbol
            ),
            RetirementStatus::Completed => format!(
                "Your carbon retirement request #{} for {} {} has been completed. Thank you for offsetting!{tx}",
                self.request_id, self.amount, self.token_symbol
            ),
            RetirementStatus::Failed => format!(
                "Your carbon retirement request #{} for {} {} has failed. Please check the transaction on the explorer.{tx}",
                self.request_id, self.amount, self.token_symbol
            ),
        }
    }
}

/// Body of `POST /api/send`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_address: Address,
    pub message: String,
}

/// Formats `amount` with `decimals`, dropping trailing fractional zeros
fn format_token_amount(amount: U256, decimals: u8) -> Result<String> {
    let formatted = format_units(amount, decimals)
        .map_err(|e| OffsetZapError::NotificationFailed(format!("cannot format amount: {e}")))?;

    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        Ok(trimmed.to_string())
    } else {
        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use rstest::rstest;

    #[rstest]
    #[case(9_950_000, "9.95")]
    #[case(10_000_000, "10")]
    #[case(1, "0.000001")]
    fn test_format_usdc_amounts(#[case] raw: u64, #[case] expected: &str) {
        assert_eq!(format_token_amount(U256::from(raw), 6).unwrap(), expected);
    }

    #[test]
    fn test_completed_template() {
        let notification = RetirementNotification::new(
            address!("2222222222222222222222222222222222222222"),
            "4242",
            U256::from(9_950_000u64),
            6,
            "USDC",
            RetirementStatus::Completed,
            None,
        )
        .unwrap();

        insta::assert_snapshot!(notification.render(), @"Your carbon retirement request #4242 for 9.95 USDC has been completed. Thank you for offsetting!");
    }

    #[test]
    fn test_payload_matches_relay_api() {
        let notification = RetirementNotification::new(
            address!("2222222222222222222222222222222222222222"),
            "7",
            U256::from(10_000_000u64),
            6,
            "USDC",
            RetirementStatus::Initiated,
            Some(TxHash::from([0xab; 32])),
        )
        .unwrap();

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["recipientAddress"], "0x2222222222222222222222222222222222222222");
        assert_eq!(json["requestId"], "7");
        assert_eq!(json["amount"], "10");
        assert_eq!(json["tokenSymbol"], "USDC");
        assert_eq!(json["status"], "initiated");
        assert!(notification.render().ends_with(&format!(
            "Transaction: {}",
            TxHash::from([0xab; 32])
        )));
    }
}
