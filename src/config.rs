//! Runtime settings for the viewer server, read from the environment
//! (a `.env` file is honoured by the binary before this is called).

use crate::error::{Result, ViewerError};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const BIND_ADDR_VAR: &str = "RECORD_VIEWER_BIND_ADDR";
pub const APP_DIR_VAR: &str = "RECORD_VIEWER_APP_DIR";
pub const PAGE_TITLE_VAR: &str = "RECORD_VIEWER_PAGE_TITLE";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8501";
const DEFAULT_PAGE_TITLE: &str = "Record Viewer";

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub bind_addr: SocketAddr,
    /// Directory that relative local locators are resolved against
    pub app_dir: PathBuf,
    /// Title of the landing page (record pages use the record title)
    pub page_title: String,
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ViewerError::Config(format!("invalid {} '{}': {}", BIND_ADDR_VAR, bind, e)))?;

        let app_dir = match lookup(APP_DIR_VAR) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => std::env::current_dir()?,
        };

        let page_title = lookup(PAGE_TITLE_VAR)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());

        Ok(Self {
            bind_addr,
            app_dir,
            page_title,
        })
    }
}
