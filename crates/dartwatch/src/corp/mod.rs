//! Company name / ticker to DART corp code resolution.
//!
//! Backed by a local JSON cache rebuilt wholesale from the bulk
//! corpCode.xml download whenever it is missing or older than seven
//! days. The cache is never patched entry-by-entry.

mod bulk;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

/// Cache lifetime; an older file triggers a full rebuild.
pub const CACHE_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const BULK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CorpError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status} downloading company directory")]
    Http { status: u16 },

    #[error("corp directory archive error: {0}")]
    Archive(String),

    #[error("corp directory parse error: {0}")]
    Parse(String),

    #[error("corp cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corp cache encode error: {0}")]
    Cache(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CorpError {
    fn from(err: reqwest::Error) -> Self {
        CorpError::Network(err.to_string())
    }
}

/// Maps a company reference (free-text name or ticker) to a corp code.
/// Tests substitute a fixture; production uses [`CorpRegistry`].
#[async_trait]
pub trait CorpResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Option<String>, CorpError>;
}

pub struct CorpRegistry {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    cache_path: PathBuf,
}

impl CorpRegistry {
    pub fn new(api_key: String, base_url: String, cache_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            cache_path,
        }
    }

    async fn load_or_rebuild(&self) -> Result<BTreeMap<String, String>, CorpError> {
        if cache_is_fresh(&self.cache_path) {
            match fs::read_to_string(&self.cache_path)
                .map_err(CorpError::from)
                .and_then(|raw| serde_json::from_str(&raw).map_err(CorpError::from))
            {
                Ok(map) => return Ok(map),
                Err(err) => {
                    warn!(%err, path = %self.cache_path.display(), "corp cache unreadable, rebuilding");
                }
            }
        }

        let map = self.download_directory().await?;
        fs::write(&self.cache_path, serde_json::to_string(&map)?)?;
        info!(companies = map.len() / 2, "cached corp codes");
        Ok(map)
    }

    async fn download_directory(&self) -> Result<BTreeMap<String, String>, CorpError> {
        info!("downloading company directory from DART");
        let url = format!("{}/corpCode.xml", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.as_str())])
            .timeout(BULK_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CorpError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        bulk::parse_corp_archive(&bytes)
    }
}

#[async_trait]
impl CorpResolver for CorpRegistry {
    async fn resolve(&self, query: &str) -> Result<Option<String>, CorpError> {
        let map = self.load_or_rebuild().await?;
        Ok(search_map(&map, query))
    }
}

fn cache_is_fresh(path: &std::path::Path) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|mtime| mtime.elapsed().ok())
        .map(|age| age < CACHE_MAX_AGE)
        .unwrap_or(false)
}

/// Exact key match first, then the first entry whose key contains the
/// query as a substring. The fallback can silently pick the wrong
/// organization when a query is a substring of several names; that
/// ambiguity is a known limitation of the source data model.
fn search_map(map: &BTreeMap<String, String>, query: &str) -> Option<String> {
    let query = query.trim().to_lowercase();
    if let Some(code) = map.get(&query) {
        return Some(code.clone());
    }
    map.iter()
        .find(|(key, _)| key.contains(&query))
        .map(|(_, code)| code.clone())
}
