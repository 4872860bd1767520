use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer};

use crate::error::{OffsetZapError, Result};

/// Seconds a quote stays usable after its `quote_timestamp`.
///
/// The SpokePool accepts older timestamps, but fees drift, and the encoded
/// message embeds the exact output amount, so quotes are refreshed well
/// before the on-chain buffer runs out.
pub const QUOTE_VALIDITY_SECS: u64 = 300;

/// Fill deadline offset applied when the API omits `fillDeadline`
pub const DEFAULT_FILL_DEADLINE_SECS: u64 = 6 * 60 * 60;

/// Deposit parameters dictated by a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositParams {
    /// Origin chain SpokePool that will receive the deposit
    pub spoke_pool: Address,
    /// Relayer holding exclusive fill rights, zero when open
    pub exclusive_relayer: Address,
    pub exclusivity_deadline: u32,
    pub quote_timestamp: u32,
    pub fill_deadline: u32,
}

/// Fee breakdown in the input token's smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayFees {
    pub total_relay_fee: U256,
    /// Total relay fee as a fraction of the input, scaled by 1e18
    pub total_relay_fee_pct: U256,
    pub lp_fee: U256,
    pub relayer_capital_fee: U256,
    pub relayer_gas_fee: U256,
}

/// A fee-adjusted bridge quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub deposit: DepositParams,
    pub input_amount: U256,
    /// Amount delivered on the destination chain after fees
    pub output_amount: U256,
    pub fees: RelayFees,
    pub estimated_fill_time_sec: u64,
}

impl Quote {
    pub fn quote_timestamp(&self) -> u64 {
        self.deposit.quote_timestamp as u64
    }

    /// Returns true once the quote is older than [`QUOTE_VALIDITY_SECS`]
    pub fn is_expired(&self, now_unix: u64) -> bool {
        now_unix.saturating_sub(self.quote_timestamp()) > QUOTE_VALIDITY_SECS
    }

    /// Errors with [`OffsetZapError::QuoteExpired`] if the quote can no longer be consumed
    pub fn ensure_fresh(&self, now_unix: u64) -> Result<()> {
        if self.is_expired(now_unix) {
            return Err(OffsetZapError::QuoteExpired {
                quote_timestamp: self.quote_timestamp(),
                now: now_unix,
            });
        }
        Ok(())
    }
}

/// A `{pct, total}` pair from the Across API
#[derive(Debug, Clone, Deserialize)]
pub struct FeeComponent {
    #[serde(deserialize_with = "de_u256")]
    pub pct: U256,
    #[serde(deserialize_with = "de_u256")]
    pub total: U256,
}

/// Deposit limits for the route at quote time
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositLimits {
    #[serde(deserialize_with = "de_u256")]
    pub min_deposit: U256,
    #[serde(deserialize_with = "de_u256")]
    pub max_deposit: U256,
}

/// Response of the Across `GET /suggested-fees` endpoint
///
/// Numeric fields arrive either as JSON numbers or as decimal strings,
/// depending on their magnitude, so both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFeesResponse {
    pub total_relay_fee: FeeComponent,
    pub relayer_capital_fee: FeeComponent,
    pub relayer_gas_fee: FeeComponent,
    pub lp_fee: FeeComponent,
    #[serde(deserialize_with = "de_u64")]
    pub timestamp: u64,
    #[serde(default)]
    pub is_amount_too_low: bool,
    pub spoke_pool_address: Address,
    #[serde(default)]
    pub exclusive_relayer: Address,
    #[serde(default, deserialize_with = "de_u64")]
    pub exclusivity_deadline: u64,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub fill_deadline: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub estimated_fill_time_sec: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u256")]
    pub output_amount: Option<U256>,
    pub limits: Option<DepositLimits>,
}

impl SuggestedFeesResponse {
    /// Converts the API response into a [`Quote`] for `input_amount`.
    ///
    /// Rejects quotes the relayer network has flagged or that fall outside
    /// the route's deposit limits.
    pub fn into_quote(self, input_amount: U256) -> Result<Quote> {
        if self.is_amount_too_low {
            return Err(OffsetZapError::QuoteUnavailable {
                reason: "amount too low to cover relay fees".to_string(),
            });
        }

        if let Some(limits) = &self.limits {
            if input_amount < limits.min_deposit || input_amount > limits.max_deposit {
                return Err(OffsetZapError::QuoteUnavailable {
                    reason: format!(
                        "amount {input_amount} outside route limits [{}, {}]",
                        limits.min_deposit, limits.max_deposit
                    ),
                });
            }
        }

        let output_amount = match self.output_amount {
            Some(amount) => amount,
            None => input_amount
                .checked_sub(self.total_relay_fee.total)
                .ok_or_else(|| OffsetZapError::QuoteUnavailable {
                    reason: "relay fee exceeds input amount".to_string(),
                })?,
        };
        if output_amount.is_zero() {
            return Err(OffsetZapError::QuoteUnavailable {
                reason: "quote leaves nothing to retire".to_string(),
            });
        }

        let quote_timestamp = to_u32(self.timestamp, "timestamp")?;
        let fill_deadline = to_u32(
            self.fill_deadline
                .unwrap_or(self.timestamp + DEFAULT_FILL_DEADLINE_SECS),
            "fillDeadline",
        )?;

        Ok(Quote {
            deposit: DepositParams {
                spoke_pool: self.spoke_pool_address,
                exclusive_relayer: self.exclusive_relayer,
                exclusivity_deadline: to_u32(self.exclusivity_deadline, "exclusivityDeadline")?,
                quote_timestamp,
                fill_deadline,
            },
            input_amount,
            output_amount,
            fees: RelayFees {
                total_relay_fee: self.total_relay_fee.total,
                total_relay_fee_pct: self.total_relay_fee.pct,
                lp_fee: self.lp_fee.total,
                relayer_capital_fee: self.relayer_capital_fee.total,
                relayer_gas_fee: self.relayer_gas_fee.total,
            },
            estimated_fill_time_sec: self.estimated_fill_time_sec.unwrap_or_default(),
        })
    }
}

fn to_u32(value: u64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| OffsetZapError::QuoteUnavailable {
        reason: format!("{field} {value} does not fit in uint32"),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn de_u256<'de, D>(deserializer: D) -> std::result::Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(U256::from(n)),
        NumberOrString::String(s) => s.parse::<U256>().map_err(serde::de::Error::custom),
    }
}

fn de_opt_u256<'de, D>(deserializer: D) -> std::result::Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(U256::from(n))),
        Some(NumberOrString::String(s)) => {
            s.parse::<U256>().map(Some).map_err(serde::de::Error::custom)
        }
    }
}

fn de_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse::<u64>().map_err(serde::de::Error::custom),
    }
}

fn de_opt_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => {
            s.parse::<u64>().map(Some).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "estimatedFillTimeSec": 4,
        "totalRelayFee": {"pct": "5000000000000000", "total": "50000"},
        "relayerCapitalFee": {"pct": "1000000000000000", "total": "10000"},
        "relayerGasFee": {"pct": "3000000000000000", "total": "30000"},
        "lpFee": {"pct": "1000000000000000", "total": "10000"},
        "timestamp": "1750000000",
        "isAmountTooLow": false,
        "quoteBlock": "31000000",
        "spokePoolAddress": "0x09aea4b2242abC8bb4BB78D537A67a245A7bEC64",
        "exclusiveRelayer": "0x0000000000000000000000000000000000000000",
        "exclusivityDeadline": 0,
        "fillDeadline": "1750021600",
        "limits": {
            "minDeposit": "500000",
            "maxDeposit": "1000000000000",
            "maxDepositInstant": "100000000000",
            "maxDepositShortDelay": "500000000000",
            "recommendedDepositInstant": "100000000000"
        }
    }"#;

    #[test]
    fn test_quote_from_suggested_fees() {
        let response: SuggestedFeesResponse = serde_json::from_str(RESPONSE).unwrap();
        let quote = response.into_quote(U256::from(10_000_000u64)).unwrap();

        assert_eq!(quote.output_amount, U256::from(9_950_000u64));
        assert_eq!(quote.fees.total_relay_fee, U256::from(50_000u64));
        assert_eq!(quote.fees.lp_fee, U256::from(10_000u64));
        assert_eq!(quote.deposit.quote_timestamp, 1_750_000_000);
        assert_eq!(quote.deposit.fill_deadline, 1_750_021_600);
        assert_eq!(quote.estimated_fill_time_sec, 4);
        assert_eq!(quote.deposit.exclusive_relayer, Address::ZERO);
    }

    #[test]
    fn test_explicit_output_amount_wins() {
        let mut value: serde_json::Value = serde_json::from_str(RESPONSE).unwrap();
        value["outputAmount"] = serde_json::json!("9949000");
        let response: SuggestedFeesResponse = serde_json::from_value(value).unwrap();

        let quote = response.into_quote(U256::from(10_000_000u64)).unwrap();
        assert_eq!(quote.output_amount, U256::from(9_949_000u64));
    }

    #[test]
    fn test_amount_below_limits_rejected() {
        let response: SuggestedFeesResponse = serde_json::from_str(RESPONSE).unwrap();
        let result = response.into_quote(U256::from(100_000u64));
        assert!(matches!(
            result,
            Err(OffsetZapError::QuoteUnavailable { .. })
        ));
    }

    #[test]
    fn test_amount_too_low_flag_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(RESPONSE).unwrap();
        value["isAmountTooLow"] = serde_json::json!(true);
        let response: SuggestedFeesResponse = serde_json::from_value(value).unwrap();

        assert!(response.into_quote(U256::from(10_000_000u64)).is_err());
    }

    #[test]
    fn test_missing_fill_deadline_uses_default_offset() {
        let mut value: serde_json::Value = serde_json::from_str(RESPONSE).unwrap();
        value.as_object_mut().unwrap().remove("fillDeadline");
        let response: SuggestedFeesResponse = serde_json::from_value(value).unwrap();

        let quote = response.into_quote(U256::from(10_000_000u64)).unwrap();
        assert_eq!(
            quote.deposit.fill_deadline as u64,
            1_750_000_000 + DEFAULT_FILL_DEADLINE_SECS
        );
    }

    #[test]
    fn test_quote_expiry_window() {
        let response: SuggestedFeesResponse = serde_json::from_str(RESPONSE).unwrap();
        let quote = response.into_quote(U256::from(10_000_000u64)).unwrap();

        assert!(!quote.is_expired(1_750_000_000 + QUOTE_VALIDITY_SECS));
        assert!(quote.is_expired(1_750_000_000 + QUOTE_VALIDITY_SECS + 1));
        assert!(matches!(
            quote.ensure_fresh(1_750_000_000 + 3600),
            Err(OffsetZapError::QuoteExpired { .. })
        ));
    }
}
