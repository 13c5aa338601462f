//! Slack webhook notification: one Block Kit message per run.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::dart::Filing;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("network error: {0}")]
    Network(String),

    #[error("webhook returned HTTP status {status}")]
    Http { status: u16 },
}

impl From<reqwest::Error> for SlackError {
    fn from(err: reqwest::Error) -> Self {
        SlackError::Network(err.to_string())
    }
}

pub async fn post_alert(webhook_url: &str, filings: &[Filing]) -> Result<(), SlackError> {
    let payload = json!({ "blocks": build_blocks(filings) });

    let resp = reqwest::Client::new()
        .post(webhook_url)
        .json(&payload)
        .timeout(WEBHOOK_TIMEOUT)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SlackError::Http {
            status: status.as_u16(),
        });
    }

    info!("slack notification sent");
    Ok(())
}

/// Header block with the count, then one section per filing.
fn build_blocks(filings: &[Filing]) -> Vec<Value> {
    let mut blocks = vec![json!({
        "type": "header",
        "text": {
            "type": "plain_text",
            "text": format!("DART Value-Up Alert — {} new filing(s)", filings.len()),
        },
    })];

    for filing in filings {
        blocks.push(json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!(
                    "*{}*\n> {}\n> Filed: {}\n> <{}|View on DART>",
                    filing.corp_name,
                    filing.report_nm,
                    filing.rcept_dt,
                    filing.url(),
                ),
            },
        }));
    }

    blocks
}
