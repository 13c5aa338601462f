//! Best-effort fan-out to the three output sinks.
//!
//! CSV ledger, email digest, and Slack webhook are independent
//! handlers invoked with the same input; a failure in one is logged
//! and never prevents the next. Nothing here retries.

pub mod email;
pub mod slack;

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::dart::Filing;
use crate::ledger::CsvLedger;

pub async fn dispatch(filings: &[Filing], config: &AppConfig, checked_on: NaiveDate) {
    let ledger = CsvLedger::new(config.ledger_file());
    if let Err(err) = ledger.record(filings, checked_on) {
        error!(%err, "csv ledger update failed");
    }

    if let Err(err) = email::send_digest(&config.email, filings, checked_on).await {
        error!(%err, "failed to send email digest");
    }

    match config.slack_webhook.as_deref() {
        Some(url) => {
            if let Err(err) = slack::post_alert(url, filings).await {
                error!(%err, "failed to send slack notification");
            }
        }
        None => debug!("slack webhook not configured, skipping"),
    }
}
