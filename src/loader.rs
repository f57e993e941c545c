//! Dataset Loader - turns a locator (local path or http(s) URL) into a Dataset
//!
//! Remote locators go through up to three attempts:
//! 1. fetch with the system trust store and parse
//! 2. fetch with the bundled webpki root store and parse
//! 3. fetch with the bundled root store and parse as UTF-8 with BOM
//!
//! Local locators are resolved against the application directory and parsed,
//! retrying as UTF-8 with BOM when the first parse fails.

use crate::dataset::Dataset;
use crate::error::{Result, ViewerError};
use async_trait::async_trait;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Characters left unescaped when re-encoding a URL path (plus ASCII alphanumerics).
pub const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Which certificate roots a fetch should trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustRoots {
    /// Platform trust store
    System,
    /// Mozilla roots compiled into the binary
    Bundled,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, roots: TrustRoots) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher holding one client per trust store.
#[derive(Clone)]
pub struct HttpFetcher {
    system: reqwest::Client,
    bundled: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let system = reqwest::Client::builder().use_native_tls().build()?;
        let bundled = reqwest::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(true)
            .build()?;
        Ok(Self { system, bundled })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, roots: TrustRoots) -> Result<Vec<u8>> {
        let client = match roots {
            TrustRoots::System => &self.system,
            TrustRoots::Bundled => &self.bundled,
        };
        debug!("GET {} ({:?} roots)", url, roots);
        let response = client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

pub fn is_http_url(s: &str) -> bool {
    let lower = s.trim_start().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Re-encode the path of an http(s) URL so non-ASCII segments are fetchable.
/// Anything that is not an http(s) URL, or does not parse, is returned as is.
pub fn normalize_url(u: &str) -> String {
    if !is_http_url(u) {
        return u.to_string();
    }
    let mut parsed = match Url::parse(u) {
        Ok(parsed) => parsed,
        Err(_) => return u.to_string(),
    };

    // The parser already escapes raw non-ASCII, so decode and re-encode with our own safe set
    let decoded = percent_decode_str(parsed.path()).decode_utf8_lossy().into_owned();
    let new_path = utf8_percent_encode(&decoded, PATH_SAFE).to_string();
    if new_path == raw_path(u) {
        return u.to_string();
    }
    parsed.set_path(&new_path);
    parsed.to_string()
}

/// Path portion of a URL exactly as written, before any parser escaping.
fn raw_path(u: &str) -> &str {
    let rest = u.split_once("://").map_or(u, |(_, rest)| rest);
    let rest = rest.split(|c| c == '?' || c == '#').next().unwrap_or("");
    match rest.find('/') {
        Some(start) => &rest[start..],
        None => "/",
    }
}

/// Local locator: relative paths resolve under `app_dir`; if that file does
/// not exist the locator is used exactly as given.
pub fn resolve_local_path(locator: &str, app_dir: &Path) -> PathBuf {
    let given = Path::new(locator);
    let candidate = if given.is_absolute() {
        given.to_path_buf()
    } else {
        app_dir.join(given)
    };
    if candidate.exists() {
        candidate
    } else {
        given.to_path_buf()
    }
}

pub struct DatasetLoader {
    fetcher: Box<dyn Fetcher>,
    app_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(fetcher: Box<dyn Fetcher>, app_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            app_dir: app_dir.into(),
        }
    }

    /// Loader using the reqwest fetcher.
    pub fn with_http(app_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(Box::new(HttpFetcher::new()?), app_dir))
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub async fn load(&self, locator: &str) -> Result<Dataset> {
        let result = if is_http_url(locator) {
            self.load_remote(&normalize_url(locator)).await
        } else {
            self.load_local(locator)
        };

        match &result {
            Ok(ds) => info!(
                "Loaded '{}': {} rows, {} columns",
                locator,
                ds.height(),
                ds.column_names().len()
            ),
            Err(e) => warn!("Giving up on '{}': {}", locator, e),
        }

        result.map_err(|e| match e {
            ViewerError::Load(_) => e,
            other => ViewerError::Load(other.to_string()),
        })
    }

    async fn load_remote(&self, url: &str) -> Result<Dataset> {
        let direct = match self.fetcher.fetch(url, TrustRoots::System).await {
            Ok(bytes) => Dataset::from_csv_bytes(bytes),
            Err(e) => Err(e),
        };
        let err = match direct {
            Ok(ds) => return Ok(ds),
            Err(e) => e,
        };
        warn!("Direct read of {} failed ({}), retrying with bundled roots", url, err);

        let bundled = match self.fetcher.fetch(url, TrustRoots::Bundled).await {
            Ok(bytes) => Dataset::from_csv_bytes(bytes),
            Err(e) => Err(e),
        };
        let err = match bundled {
            Ok(ds) => return Ok(ds),
            Err(e) => e,
        };
        warn!("Read of {} with bundled roots failed ({}), retrying as UTF-8 with BOM", url, err);

        let bytes = self.fetcher.fetch(url, TrustRoots::Bundled).await?;
        Dataset::from_csv_bytes_with_bom(bytes)
    }

    fn load_local(&self, locator: &str) -> Result<Dataset> {
        let path = resolve_local_path(locator, &self.app_dir);
        debug!("Reading local CSV {}", path.display());

        match Dataset::from_csv_path(&path) {
            Ok(ds) => Ok(ds),
            Err(e) => {
                warn!("Read of {} failed ({}), retrying as UTF-8 with BOM", path.display(), e);
                let bytes = std::fs::read(&path)?;
                Dataset::from_csv_bytes_with_bom(bytes)
            }
        }
    }
}
