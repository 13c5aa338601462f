//! Append-only CSV ledger of matched filings.
//!
//! New rows are appended to whatever is already on disk, then the
//! whole table is deduplicated by receipt number (first occurrence
//! wins) and rewritten in full.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::dart::Filing;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub company: String,
    pub stock_code: String,
    pub report_title: String,
    pub filed_date: String,
    pub receipt_no: String,
    pub dart_url: String,
    /// Date the row was written, not the filing date.
    pub checked_on: String,
}

impl LedgerRow {
    fn from_filing(filing: &Filing, checked_on: NaiveDate) -> Self {
        Self {
            company: filing.corp_name.clone(),
            stock_code: filing.stock_code.clone(),
            report_title: filing.report_nm.clone(),
            filed_date: filing.rcept_dt.clone(),
            receipt_no: filing.rcept_no.clone(),
            dart_url: filing.url(),
            checked_on: checked_on.format("%Y-%m-%d").to_string(),
        }
    }
}

pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append the given filings and rewrite the deduplicated table.
    /// Returns the number of distinct rows on disk afterwards.
    pub fn record(&self, filings: &[Filing], checked_on: NaiveDate) -> Result<usize, LedgerError> {
        let mut rows = self.rows()?;
        rows.extend(
            filings
                .iter()
                .map(|filing| LedgerRow::from_filing(filing, checked_on)),
        );

        let mut recorded = HashSet::new();
        rows.retain(|row| recorded.insert(row.receipt_no.clone()));

        let mut writer = csv::Writer::from_path(&self.path)?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(
            new = filings.len(),
            total = rows.len(),
            path = %self.path.display(),
            "saved value-up filings to csv"
        );
        Ok(rows.len())
    }

    pub fn rows(&self) -> Result<Vec<LedgerRow>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize::<LedgerRow>() {
            rows.push(row?);
        }
        Ok(rows)
    }
}
