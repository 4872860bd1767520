use alloy_primitives::TxHash;
use serde::Deserialize;

/// Fill status of a deposit, as reported by the Across API
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DepositStatus {
    Pending,
    Filled,
    /// Fill deadline passed; the deposit will be refunded on the origin chain
    Expired,
    Refunded,
    SlowFillRequested,
}

/// Response of the Across `GET /deposit/status` endpoint
///
/// This is a monitoring signal only. A `filled` status is confirmed against
/// the destination chain receipt before the pipeline reports a fill.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositStatusResponse {
    pub status: DepositStatus,
    #[serde(default)]
    pub fill_tx: Option<TxHash>,
    #[serde(default)]
    pub deposit_tx_hash: Option<TxHash>,
    #[serde(default)]
    pub destination_chain_id: Option<u64>,
}

impl DepositStatusResponse {
    pub fn pending() -> Self {
        Self {
            status: DepositStatus::Pending,
            fill_tx: None,
            deposit_tx_hash: None,
            destination_chain_id: None,
        }
    }

    pub fn filled(fill_tx: TxHash) -> Self {
        Self {
            status: DepositStatus::Filled,
            fill_tx: Some(fill_tx),
            ..Self::pending()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_filled() {
        let json = r#"{
            "status": "filled",
            "fillTx": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "destinationChainId": 137,
            "pagination": {"currentIndex": 0, "maxIndex": 0}
        }"#;
        let response: DepositStatusResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, DepositStatus::Filled);
        assert_eq!(response.fill_tx, Some(TxHash::from([0x11; 32])));
        assert_eq!(response.destination_chain_id, Some(137));
    }

    #[test]
    fn test_deserialize_pending_without_fill() {
        let response: DepositStatusResponse =
            serde_json::from_str(r#"{"status":"pending","fillTx":null}"#).unwrap();
        assert_eq!(response, DepositStatusResponse::pending());
    }

    #[test]
    fn test_deserialize_slow_fill_requested() {
        let response: DepositStatusResponse =
            serde_json::from_str(r#"{"status":"slowFillRequested"}"#).unwrap();
        assert_eq!(response.status, DepositStatus::SlowFillRequested);
    }
}
