//! Retirement protocol types and definitions
//!
//! This module contains the domain types that flow through a retirement:
//! the request a user submits, the bridge quote, the encoded destination
//! message, progress and history records, Across deposit status and relay
//! notifications.

mod deposit_status;
mod history;
mod message;
mod notification;
mod pool_token;
mod progress;
mod quote;
mod receipt;
mod request;

pub use deposit_status::{DepositStatus, DepositStatusResponse};
pub use history::TransactionHistory;
pub use message::{encode_deposit_message, EncodedMessage, RetirementIntent};
pub use notification::{RetirementNotification, RetirementStatus, SendMessageRequest};
pub use pool_token::PoolToken;
pub use progress::{PipelineState, ProgressEvent, ProgressStep, TransactionRecord, TxStatus};
pub use quote::{
    DepositParams, Quote, RelayFees, SuggestedFeesResponse, DEFAULT_FILL_DEADLINE_SECS,
    QUOTE_VALIDITY_SECS,
};
pub use receipt::ReceiptSummary;
pub use request::{RetirementRequest, MAX_BENEFICIARY_NAME_LEN, MAX_RETIREMENT_MESSAGE_LEN};
