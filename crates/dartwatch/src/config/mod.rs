use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default API key value. A run aborts while the key is still set to
/// this placeholder.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_DART_API_KEY_HERE";

/// Base URL for the OpenDART API.
pub const DEFAULT_DART_BASE: &str = "https://opendart.fss.or.kr/api";

const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Top-level configuration for a checker run, constructed once at
/// startup and passed to every component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub dart_base: String,
    pub email: EmailConfig,
    pub slack_webhook: Option<String>,
    /// Directory holding the seen-state, corp-cache, and CSV files.
    pub data_dir: PathBuf,
    pub companies_file: PathBuf,
    pub lookback_days: i64,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key =
            env::var("DART_API_KEY").unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string());
        let dart_base =
            env::var("DART_BASE_URL").unwrap_or_else(|_| DEFAULT_DART_BASE.to_string());

        let email = EmailConfig {
            sender: env::var("EMAIL_SENDER").unwrap_or_default(),
            password: env::var("EMAIL_PASSWORD").unwrap_or_default(),
            recipients: env::var("EMAIL_TO").unwrap_or_default(),
        };

        let slack_webhook = env::var("SLACK_WEBHOOK_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let data_dir = env::var("DARTWATCH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let companies_file = env::var("COMPANIES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("companies.txt"));

        let lookback_days = match env::var("LOOKBACK_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidLookbackDays { value: raw })?,
            Err(_) => DEFAULT_LOOKBACK_DAYS,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_key,
            dart_base,
            email,
            slack_webhook,
            data_dir,
            companies_file,
            lookback_days,
            telemetry: TelemetryConfig { log_level },
        })
    }

    pub fn api_key_is_placeholder(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }

    pub fn seen_file(&self) -> PathBuf {
        self.data_dir.join("seen_filings.json")
    }

    pub fn corp_cache_file(&self) -> PathBuf {
        self.data_dir.join("corp_codes.json")
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir.join("value_up_filings.csv")
    }
}

/// Email sink settings. The sink is disabled until all three fields
/// are present.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub sender: String,
    pub password: String,
    /// Comma-separated recipient addresses.
    pub recipients: String,
}

impl EmailConfig {
    pub fn is_complete(&self) -> bool {
        !self.sender.trim().is_empty()
            && !self.password.trim().is_empty()
            && !self.recipients.trim().is_empty()
    }

    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LOOKBACK_DAYS must be a positive number of days, got '{value}'")]
    InvalidLookbackDays { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("DART_API_KEY");
        env::remove_var("DART_BASE_URL");
        env::remove_var("EMAIL_SENDER");
        env::remove_var("EMAIL_PASSWORD");
        env::remove_var("EMAIL_TO");
        env::remove_var("SLACK_WEBHOOK_URL");
        env::remove_var("DARTWATCH_DATA_DIR");
        env::remove_var("COMPANIES_FILE");
        env::remove_var("LOOKBACK_DAYS");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert!(config.api_key_is_placeholder());
        assert_eq!(config.dart_base, DEFAULT_DART_BASE);
        assert_eq!(config.lookback_days, 90);
        assert!(config.slack_webhook.is_none());
        assert!(!config.email.is_complete());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.seen_file(), PathBuf::from("./seen_filings.json"));
    }

    #[test]
    fn rejects_non_numeric_lookback() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOOKBACK_DAYS", "ninety");
        let result = AppConfig::load();
        env::remove_var("LOOKBACK_DAYS");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidLookbackDays { .. })
        ));
    }

    #[test]
    fn blank_webhook_counts_as_unconfigured() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SLACK_WEBHOOK_URL", "   ");
        let config = AppConfig::load().expect("config loads");
        env::remove_var("SLACK_WEBHOOK_URL");
        assert!(config.slack_webhook.is_none());
    }

    #[test]
    fn recipient_list_splits_and_trims() {
        let email = EmailConfig {
            sender: "alerts@example.com".to_string(),
            password: "app-password".to_string(),
            recipients: "one@example.com, two@example.com ,".to_string(),
        };
        assert!(email.is_complete());
        assert_eq!(
            email.recipient_list(),
            vec!["one@example.com".to_string(), "two@example.com".to_string()]
        );
    }
}
