use crate::domain::Transaction;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes ledger reports. Nothing is ever read back from them.
pub struct LedgerExporter;

impl LedgerExporter {
    pub const HEADER: [&'static str; 8] = [
        "transaction_id",
        "property_id",
        "from_owner",
        "to_owner",
        "value",
        "timestamp",
        "status",
        "block_hash",
    ];

    /// Writes one row per transaction and returns the row count.
    pub fn export_transactions(
        transactions: &[&Transaction],
        path: impl AsRef<Path>,
    ) -> Result<usize, ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(Self::HEADER)?;
        for tx in transactions {
            writer.write_record([
                tx.id.to_string(),
                tx.property_id.to_string(),
                tx.from_owner.clone(),
                tx.to_owner.clone(),
                format!("{:.2}", tx.value),
                tx.timestamp.to_rfc3339(),
                tx.status.label().to_string(),
                tx.block_hash.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(transactions.len())
    }
}
