//! Retirement orchestration
//!
//! [`RetirementPipeline`] drives a single retirement from quote to
//! notification; [`FacilitatorAdmin`] covers the owner-only side of the
//! destination contract.

mod admin;
mod config;
mod receipts;
mod retirement;
mod token_state;

pub use admin::FacilitatorAdmin;
pub use config::PollingConfig;
pub use receipts::wait_for_receipt;
pub use retirement::{DepositReceipt, ProgressTracker, RetirementOutcome, RetirementPipeline};
pub use token_state::TokenState;
