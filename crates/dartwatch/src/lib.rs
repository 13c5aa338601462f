//! Core library for the DART value-up plan checker.
//!
//! A run is a single linear batch: resolve each watched company to its
//! DART corp code, search recent filings across both disclosure
//! categories, keep the titles matching the value-up keyword list,
//! diff against the persisted seen set, and fan the new matches out to
//! the CSV ledger, email digest, and Slack webhook.

pub mod checker;
pub mod classify;
pub mod config;
pub mod corp;
pub mod dart;
pub mod error;
pub mod ledger;
pub mod notify;
pub mod state;
pub mod telemetry;

pub use checker::{RunSummary, ValueUpChecker};
pub use config::AppConfig;
pub use error::CheckError;
