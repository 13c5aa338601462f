//! OpenDART filing search client.
//!
//! One search per disclosure category, merged. The provider's "no
//! results" status is a normal empty answer; any other failure for a
//! category is logged and degrades to an empty result so the rest of
//! the run continues.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// DART viewer page for a single filing.
pub const DART_VIEWER_BASE: &str = "https://dart.fss.or.kr/dsaf001/main.do";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const STATUS_SUCCESS: &str = "000";
const STATUS_NO_RESULTS: &str = "013";

/// The two disclosure classifications searched on every run. Value-up
/// plans show up under either, so both are always queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisclosureCategory {
    /// 정기공시 (`pblntf_ty=A`).
    #[default]
    Regular,
    /// 자율공시 (`pblntf_ty=B`).
    Voluntary,
}

impl DisclosureCategory {
    pub const fn all() -> [Self; 2] {
        [Self::Regular, Self::Voluntary]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Regular => "A",
            Self::Voluntary => "B",
        }
    }
}

/// One disclosure instance. Identity is `rcept_no`; every other field
/// is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Filing {
    #[serde(default)]
    pub corp_name: String,
    #[serde(default)]
    pub stock_code: String,
    #[serde(default)]
    pub report_nm: String,
    #[serde(default)]
    pub rcept_dt: String,
    #[serde(default)]
    pub rcept_no: String,
    #[serde(skip)]
    pub category: DisclosureCategory,
}

impl Filing {
    /// Direct DART viewer URL for this filing.
    pub fn url(&self) -> String {
        format!("{DART_VIEWER_BASE}?rcpNo={}", self.rcept_no)
    }
}

/// Inclusive date range searched on each run, sent as 8-digit
/// `YYYYMMDD` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilingWindow {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl FilingWindow {
    pub fn ending_at(end: NaiveDate, lookback_days: i64) -> Self {
        Self {
            begin: end - chrono::Duration::days(lookback_days),
            end,
        }
    }

    pub fn begin_param(&self) -> String {
        self.begin.format("%Y%m%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

#[derive(Debug, Error)]
pub enum DartError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status} from DART")]
    Http { status: u16 },

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for DartError {
    fn from(err: reqwest::Error) -> Self {
        DartError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for DartError {
    fn from(err: serde_json::Error) -> Self {
        DartError::Parse(err.to_string())
    }
}

/// Source of filing records for one company and window. The production
/// implementation is [`DartClient`]; tests substitute fixtures.
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// Never fails: per-category errors degrade to empty results.
    async fn search_filings(&self, corp_code: &str, window: &FilingWindow) -> Vec<Filing>;
}

pub struct DartClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DartClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    async fn search_category(
        &self,
        corp_code: &str,
        window: &FilingWindow,
        category: DisclosureCategory,
    ) -> Result<Vec<Filing>, DartError> {
        let url = format!("{}/list.json", self.base_url);
        let begin = window.begin_param();
        let end = window.end_param();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("crtfc_key", self.api_key.as_str()),
                ("corp_code", corp_code),
                ("bgn_de", begin.as_str()),
                ("end_de", end.as_str()),
                ("pblntf_ty", category.code()),
                ("page_count", "100"),
                ("sort", "date"),
                ("sort_mth", "desc"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DartError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        parse_search_response(&body, category)
    }
}

#[async_trait]
impl FilingSource for DartClient {
    async fn search_filings(&self, corp_code: &str, window: &FilingWindow) -> Vec<Filing> {
        let mut merged = Vec::new();
        for category in DisclosureCategory::all() {
            match self.search_category(corp_code, window, category).await {
                Ok(mut filings) => merged.append(&mut filings),
                Err(err) => {
                    tracing::error!(
                        corp_code,
                        category = category.code(),
                        %err,
                        "filing search failed, treating category as empty"
                    );
                }
            }
        }
        merged
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    list: Vec<Filing>,
}

/// Interpret one search response body. "000" carries results, "013"
/// means no results (not an error); anything else is logged and
/// treated as empty.
fn parse_search_response(
    body: &str,
    category: DisclosureCategory,
) -> Result<Vec<Filing>, DartError> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    match parsed.status.as_str() {
        STATUS_SUCCESS => Ok(parsed
            .list
            .into_iter()
            .map(|filing| Filing { category, ..filing })
            .collect()),
        STATUS_NO_RESULTS => Ok(Vec::new()),
        other => {
            tracing::warn!(
                status = other,
                message = %parsed.message,
                "DART API returned non-success status"
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_yields_filings_tagged_with_category() {
        let body = r#"{
            "status": "000",
            "message": "정상",
            "list": [
                {
                    "corp_name": "삼성전자",
                    "stock_code": "005930",
                    "report_nm": "기업가치제고계획",
                    "rcept_dt": "20250815",
                    "rcept_no": "20250815000123"
                }
            ]
        }"#;

        let filings =
            parse_search_response(body, DisclosureCategory::Voluntary).expect("parses");
        assert_eq!(filings.len(), 1);
        assert_eq!(filings[0].rcept_no, "20250815000123");
        assert_eq!(filings[0].category, DisclosureCategory::Voluntary);
    }

    #[test]
    fn no_results_status_is_empty_not_error() {
        let body = r#"{"status": "013", "message": "조회된 데이타가 없습니다."}"#;
        let filings = parse_search_response(body, DisclosureCategory::Regular).expect("parses");
        assert!(filings.is_empty());
    }

    #[test]
    fn unknown_status_degrades_to_empty() {
        let body = r#"{"status": "020", "message": "사용한도 초과"}"#;
        let filings = parse_search_response(body, DisclosureCategory::Regular).expect("parses");
        assert!(filings.is_empty());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let result = parse_search_response("<html>502</html>", DisclosureCategory::Regular);
        assert!(matches!(result, Err(DartError::Parse(_))));
    }

    #[test]
    fn filing_url_points_at_the_viewer() {
        let filing = Filing {
            corp_name: "Acme".to_string(),
            stock_code: "012345".to_string(),
            report_nm: "value-up plan".to_string(),
            rcept_dt: "20250801".to_string(),
            rcept_no: "20250801000001".to_string(),
            category: DisclosureCategory::Regular,
        };
        assert_eq!(
            filing.url(),
            "https://dart.fss.or.kr/dsaf001/main.do?rcpNo=20250801000001"
        );
    }

    #[test]
    fn window_params_use_compact_dates() {
        let end = NaiveDate::from_ymd_opt(2025, 8, 29).expect("valid date");
        let window = FilingWindow::ending_at(end, 90);
        assert_eq!(window.end_param(), "20250829");
        assert_eq!(window.begin_param(), "20250531");
    }
}
