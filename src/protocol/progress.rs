//! Progress reporting for a retirement pipeline
//!
//! Every state transition is reported as a [`ProgressEvent`]. Transaction
//! level detail is carried in [`TransactionRecord`]s, which are appended once
//! per step and only ever have their status, hash and timestamp updated.

use alloy_primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain step of a bridge deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStep {
    /// ERC-20 allowance for the SpokePool, skipped when already sufficient
    Approve,
    /// `depositV3` on the origin chain
    Deposit,
    /// Relayer fill on the destination chain, observed only
    Fill,
}

impl ProgressStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deposit => "deposit",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    Pending,
    TxSent,
    TxSuccess,
    Error,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TxSuccess | Self::Error)
    }
}

/// One step's transaction, as persisted in the transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    hash: Option<TxHash>,
    step: ProgressStep,
    status: TxStatus,
    chain_id: u64,
    /// Across deposit id of the run this record belongs to, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deposit_id: Option<u32>,
    created_at: u64,
    updated_at: u64,
}

impl TransactionRecord {
    /// A pending record for `step` on `chain_id`, created at `now` (unix seconds)
    pub fn new(step: ProgressStep, chain_id: u64, now: u64) -> Self {
        Self {
            hash: None,
            step,
            status: TxStatus::Pending,
            chain_id,
            deposit_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the record to `status`, keeping the previous hash when `hash` is `None`
    pub fn update(&mut self, status: TxStatus, hash: Option<TxHash>, now: u64) {
        self.status = status;
        if hash.is_some() {
            self.hash = hash;
        }
        self.updated_at = now;
    }

    /// Tags the record with the deposit id of its run
    pub fn set_deposit_id(&mut self, deposit_id: u32) {
        self.deposit_id = Some(deposit_id);
    }

    pub fn deposit_id(&self) -> Option<u32> {
        self.deposit_id
    }

    pub fn hash(&self) -> Option<TxHash> {
        self.hash
    }

    pub fn step(&self) -> ProgressStep {
        self.step
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }
}

/// Coarse state of the pipeline, derived from the last event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Quoting,
    Approving,
    Depositing,
    AwaitingFill,
    Filled,
    Failed,
    /// Funds left the origin chain but no fill was confirmed before the deadline
    Abandoned,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Failed | Self::Abandoned)
    }
}

/// A state transition reported while a retirement runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Quoting,
    Quoted {
        output_amount: U256,
        total_relay_fee: U256,
        estimated_fill_time_sec: u64,
    },
    Transaction(TransactionRecord),
    AwaitingFill {
        deposit_id: u32,
        deposit_tx: TxHash,
    },
    Filled {
        deposit_id: u32,
        fill_tx: TxHash,
    },
    Failed {
        reason: String,
    },
    Abandoned {
        deposit_id: u32,
        deposit_tx: TxHash,
    },
    /// The deposit was broadcast but neither its receipt nor its deposit id
    /// could be read
    Unconfirmed {
        deposit_tx: TxHash,
    },
}

impl ProgressEvent {
    pub fn state(&self) -> PipelineState {
        match self {
            Self::Quoting | Self::Quoted { .. } => PipelineState::Quoting,
            Self::Transaction(record) => match record.step() {
                ProgressStep::Approve => PipelineState::Approving,
                ProgressStep::Deposit => PipelineState::Depositing,
                ProgressStep::Fill => PipelineState::AwaitingFill,
            },
            Self::AwaitingFill { .. } => PipelineState::AwaitingFill,
            Self::Filled { .. } => PipelineState::Filled,
            Self::Failed { .. } => PipelineState::Failed,
            Self::Abandoned { .. } | Self::Unconfirmed { .. } => PipelineState::Abandoned,
        }
    }

    /// The transaction step this event reports on, if any
    pub fn step(&self) -> Option<ProgressStep> {
        match self {
            Self::Transaction(record) => Some(record.step()),
            Self::Unconfirmed { .. } => Some(ProgressStep::Deposit),
            Self::AwaitingFill { .. } | Self::Filled { .. } | Self::Abandoned { .. } => {
                Some(ProgressStep::Fill)
            }
            _ => None,
        }
    }
}
