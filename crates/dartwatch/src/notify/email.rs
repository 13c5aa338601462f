//! HTML digest email over implicit-TLS SMTP.

use std::fmt::Write as _;

use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;
use crate::dart::Filing;

const SMTP_RELAY: &str = "smtp.gmail.com";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("message build error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Send one digest covering all new filings in the run. Returns
/// `Ok(false)` without touching the network when the email settings
/// are incomplete.
pub async fn send_digest(
    config: &EmailConfig,
    filings: &[Filing],
    checked_on: NaiveDate,
) -> Result<bool, EmailError> {
    if !config.is_complete() {
        info!("email not configured, skipping");
        return Ok(false);
    }

    let recipients = config.recipient_list();
    let subject = format!("[DART Value-Up Alert] {} new filing(s) found", filings.len());
    let html = render_digest(filings, checked_on);

    let mut builder = Message::builder()
        .from(config.sender.parse::<Mailbox>()?)
        .subject(subject);
    for recipient in &recipients {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }
    let message = builder.header(ContentType::TEXT_HTML).body(html)?;

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_RELAY)?
        .credentials(Credentials::new(
            config.sender.clone(),
            config.password.clone(),
        ))
        .build();
    mailer.send(message).await?;

    info!(?recipients, "email digest sent");
    Ok(true)
}

fn render_digest(filings: &[Filing], checked_on: NaiveDate) -> String {
    let mut rows = String::new();
    for filing in filings {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href='{}'>View on DART</a></td></tr>\n",
            filing.corp_name,
            filing.report_nm,
            filing.rcept_dt,
            filing.url()
        );
    }

    format!(
        "<html><body>\
         <h2>DART Value-Up Plan Alert</h2>\
         <p>The following new <strong>기업가치제고계획</strong> (Value-Up Plan) \
         disclosures were found on DART:</p>\
         <table border=\"1\" cellpadding=\"6\" cellspacing=\"0\" \
         style=\"border-collapse:collapse;font-family:sans-serif;\">\
         <thead style=\"background:#f0f0f0;\">\
         <tr><th>Company</th><th>Report Title</th><th>Date Filed</th><th>Link</th></tr>\
         </thead>\
         <tbody>{rows}</tbody>\
         </table>\
         <p style=\"color:gray;font-size:12px;\">\
         Automated alert from dart-value-up · {date}\
         </p>\
         </body></html>",
        rows = rows,
        date = checked_on.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dart::DisclosureCategory;

    fn filing() -> Filing {
        Filing {
            corp_name: "삼성전자".to_string(),
            stock_code: "005930".to_string(),
            report_nm: "기업가치제고계획".to_string(),
            rcept_dt: "20250815".to_string(),
            rcept_no: "20250815000123".to_string(),
            category: DisclosureCategory::Voluntary,
        }
    }

    #[test]
    fn digest_lists_each_filing_with_viewer_link() {
        let checked_on = NaiveDate::from_ymd_opt(2025, 8, 29).expect("valid date");
        let html = render_digest(&[filing()], checked_on);
        assert!(html.contains("삼성전자"));
        assert!(html.contains("기업가치제고계획"));
        assert!(html.contains("rcpNo=20250815000123"));
        assert!(html.contains("2025-08-29"));
    }

    #[tokio::test]
    async fn incomplete_config_skips_without_network() {
        let config = EmailConfig {
            sender: "alerts@example.com".to_string(),
            password: String::new(),
            recipients: "ops@example.com".to_string(),
        };
        let checked_on = NaiveDate::from_ymd_opt(2025, 8, 29).expect("valid date");
        let sent = send_digest(&config, &[filing()], checked_on)
            .await
            .expect("skip is not an error");
        assert!(!sent);
    }
}
