//! Run orchestration: one complete, independent batch per invocation.
//!
//! Companies are processed strictly in list order; the seen set and
//! the collected matches are owned here for the whole run and the seen
//! set is persisted exactly once, after all companies are processed.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::classify::is_value_up;
use crate::config::AppConfig;
use crate::corp::{CorpRegistry, CorpResolver};
use crate::dart::{DartClient, Filing, FilingSource, FilingWindow};
use crate::error::CheckError;
use crate::notify;
use crate::state::{JsonSeenStore, SeenStore};

/// Built-in watch list used when the companies file is absent.
pub const EXAMPLE_COMPANIES: [&str; 4] = ["삼성전자", "005930", "현대차", "POSCO홀딩스"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub companies: usize,
    pub skipped: usize,
    pub evaluated: usize,
    pub new_matches: usize,
}

pub struct ValueUpChecker {
    config: AppConfig,
    resolver: Box<dyn CorpResolver>,
    source: Box<dyn FilingSource>,
    seen: Box<dyn SeenStore>,
}

impl ValueUpChecker {
    /// Wire up the production collaborators from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        let resolver = CorpRegistry::new(
            config.api_key.clone(),
            config.dart_base.clone(),
            config.corp_cache_file(),
        );
        let source = DartClient::new(config.api_key.clone(), config.dart_base.clone());
        let seen = JsonSeenStore::new(config.seen_file());
        Self::with_parts(config, Box::new(resolver), Box::new(source), Box::new(seen))
    }

    pub fn with_parts(
        config: AppConfig,
        resolver: Box<dyn CorpResolver>,
        source: Box<dyn FilingSource>,
        seen: Box<dyn SeenStore>,
    ) -> Self {
        Self {
            config,
            resolver,
            source,
            seen,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary, CheckError> {
        if self.config.api_key_is_placeholder() {
            return Err(CheckError::MissingApiKey);
        }

        let companies = load_companies(&self.config.companies_file);
        info!(count = companies.len(), "monitoring companies");

        let mut seen: HashSet<String> = self.seen.load()?;
        let window = FilingWindow::ending_at(today, self.config.lookback_days);
        let mut new_filings: Vec<Filing> = Vec::new();
        let mut summary = RunSummary {
            companies: companies.len(),
            ..Default::default()
        };

        for company in &companies {
            let corp_code = match self.resolver.resolve(company).await? {
                Some(code) => code,
                None => {
                    warn!(company = %company, "could not find DART corp code");
                    summary.skipped += 1;
                    continue;
                }
            };

            info!(company = %company, corp_code = %corp_code, "checking filings");
            let filings = self.source.search_filings(&corp_code, &window).await;
            info!(company = %company, count = filings.len(), "filings returned from DART");

            for filing in filings {
                summary.evaluated += 1;
                debug!(date = %filing.rcept_dt, title = %filing.report_nm, "evaluating filing");

                if seen.contains(&filing.rcept_no) {
                    debug!(rcept_no = %filing.rcept_no, "already seen, skipping");
                    continue;
                }

                // Non-matches are marked seen too, so they are never
                // re-evaluated under a later keyword list.
                seen.insert(filing.rcept_no.clone());
                if is_value_up(&filing.report_nm) {
                    info!(
                        title = %filing.report_nm,
                        date = %filing.rcept_dt,
                        "new value-up filing"
                    );
                    new_filings.push(filing);
                }
            }
        }

        self.seen.save(&seen)?;
        summary.new_matches = new_filings.len();

        if new_filings.is_empty() {
            info!("no new value-up plan filings found");
        } else {
            info!(count = new_filings.len(), "found new value-up filings");
            notify::dispatch(&new_filings, &self.config, today).await;
        }

        Ok(summary)
    }
}

/// Read the watch list: one company reference per line, blank lines
/// and `#` comments ignored. A missing file falls back to the built-in
/// example list with a warning.
pub fn load_companies(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(raw) => raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect(),
        Err(_) => {
            warn!(
                path = %path.display(),
                "companies file not found, using built-in example list"
            );
            EXAMPLE_COMPANIES.iter().map(|c| c.to_string()).collect()
        }
    }
}
