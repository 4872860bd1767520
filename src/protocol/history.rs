//! Transaction history persistence
//!
//! History is a JSON array of [`TransactionRecord`]s stored in a single file,
//! one file per user session. Nothing is kept server-side.

use std::path::Path;

use super::TransactionRecord;
use crate::error::Result;

/// Ordered list of transaction records for past and current retirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionHistory {
    records: Vec<TransactionRecord>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads history from `path`, returning an empty history if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(Self {
            records: serde_json::from_str(&contents)?,
        })
    }

    /// Writes the full history to `path` as a JSON array
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Appends a record and returns its index
    pub fn push(&mut self, record: TransactionRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Replaces the record at `index` with its updated version.
    ///
    /// The step of a record never changes, so a record for a different
    /// step is ignored.
    pub fn replace(&mut self, index: usize, record: TransactionRecord) {
        if let Some(existing) = self.records.get_mut(index) {
            if existing.step() == record.step() {
                *existing = record;
            }
        }
    }

    /// Tags every record with `deposit_id`
    pub fn tag_deposit(&mut self, deposit_id: u32) {
        for record in &mut self.records {
            record.set_deposit_id(deposit_id);
        }
    }

    /// Records of the run that produced `deposit_id`
    pub fn for_deposit(&self, deposit_id: u32) -> impl Iterator<Item = &TransactionRecord> {
        self.records
            .iter()
            .filter(move |record| record.deposit_id() == Some(deposit_id))
    }

    /// Appends every record of `other`
    pub fn extend(&mut self, other: TransactionHistory) {
        self.records.extend(other.records);
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ProgressStep, TxStatus};
    use alloy_primitives::TxHash;

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "offsetzap-history-{}.json",
            std::process::id()
        ));

        let mut history = TransactionHistory::new();
        let index = history.push(TransactionRecord::new(ProgressStep::Deposit, 8453, 10));
        let mut record = history.records()[index].clone();
        record.update(TxStatus::TxSuccess, Some(TxHash::from([2u8; 32])), 20);
        history.replace(index, record);

        history.save(&path).unwrap();
        let loaded = TransactionHistory::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, history);
        assert_eq!(loaded.records()[0].status(), TxStatus::TxSuccess);
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let path = std::env::temp_dir().join("offsetzap-history-does-not-exist.json");
        assert!(TransactionHistory::load(path).unwrap().is_empty());
    }

    #[test]
    fn test_replace_ignores_step_changes() {
        let mut history = TransactionHistory::new();
        let index = history.push(TransactionRecord::new(ProgressStep::Approve, 8453, 1));
        history.replace(index, TransactionRecord::new(ProgressStep::Fill, 137, 2));

        assert_eq!(history.records()[0].step(), ProgressStep::Approve);
    }

    #[test]
    fn test_runs_are_told_apart_by_deposit_id() {
        let mut first = TransactionHistory::new();
        first.push(TransactionRecord::new(ProgressStep::Approve, 8453, 1));
        first.push(TransactionRecord::new(ProgressStep::Deposit, 8453, 2));
        first.tag_deposit(7);

        let mut second = TransactionHistory::new();
        second.push(TransactionRecord::new(ProgressStep::Deposit, 8453, 3));
        second.tag_deposit(8);

        first.extend(second);

        let steps: Vec<_> = first.for_deposit(7).map(|r| r.step()).collect();
        assert_eq!(steps, vec![ProgressStep::Approve, ProgressStep::Deposit]);
        assert_eq!(first.for_deposit(8).count(), 1);
        assert_eq!(first.for_deposit(9).count(), 0);
    }
}
