//! Lookup form validation.
//!
//! A submission only moves the page when the candidate locator loads, is
//! non-empty, has an id-like column and contains the identifier. Any other
//! outcome becomes an inline message and the query parameters stay put.

use crate::cache::DatasetCache;
use crate::columns::{resolve_role, ColumnRole};
use crate::error::{Result, ViewerError};
use crate::params::{LookupSubmission, QueryParams};
use tracing::info;

pub const BLANK_FIELDS_MESSAGE: &str = "please fill both CSV and ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Reload the page with these parameters.
    Redirect(QueryParams),
    /// Stay on the current page and show this message.
    Rejected(String),
}

/// Check a candidate (locator, identifier) pair against a freshly loaded dataset.
pub async fn validate_lookup(cache: &DatasetCache, csv: &str, id: &str) -> Result<QueryParams> {
    let dataset = cache.get_or_load(csv).await?;
    if dataset.is_empty() {
        return Err(ViewerError::EmptyDataset);
    }

    let key_column = resolve_role(&dataset.column_names(), ColumnRole::Id)
        .ok_or(ViewerError::MissingKeyColumn)?;

    match dataset.find_row(&key_column, id)? {
        Some(_) => Ok(QueryParams::new(csv, Some(id.to_string()))),
        None => Err(ViewerError::NotFound(id.to_string())),
    }
}

pub async fn submit_lookup(cache: &DatasetCache, submission: &LookupSubmission) -> LookupOutcome {
    let csv = submission.csv.trim();
    let id = submission.id.trim();
    if csv.is_empty() || id.is_empty() {
        return LookupOutcome::Rejected(BLANK_FIELDS_MESSAGE.to_string());
    }

    match validate_lookup(cache, csv, id).await {
        Ok(params) => {
            info!("Lookup accepted: csv='{}' id='{}'", csv, id);
            LookupOutcome::Redirect(params)
        }
        Err(e) => {
            info!("Lookup rejected: {}", e);
            LookupOutcome::Rejected(e.user_message())
        }
    }
}
