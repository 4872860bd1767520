use alloy_primitives::{Log, TxHash};

/// The parts of a transaction receipt the pipeline derives status from
///
/// Receipts are the only authoritative source of whether a transaction
/// succeeded; progress callbacks and status APIs are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// `true` if the transaction executed without reverting
    pub success: bool,
    pub logs: Vec<Log>,
}
