//! Picks the row to display.

use crate::dataset::{Dataset, Record};
use crate::error::{Result, ViewerError};
use tracing::debug;

/// Row whose `id_column` text equals `identifier`, falling back to row 0 when
/// there is no id column, no identifier, or no match.
///
/// The silent fallback on a miss is intentional for the main view; the lookup
/// form is where a miss is reported.
pub fn select_record(
    dataset: &Dataset,
    id_column: Option<&str>,
    identifier: Option<&str>,
) -> Result<Record> {
    if dataset.is_empty() {
        return Err(ViewerError::EmptyDataset);
    }

    let mut row_index = 0;
    if let (Some(column), Some(identifier)) = (id_column, identifier) {
        if !identifier.is_empty() {
            match dataset.find_row(column, identifier)? {
                Some(row) => row_index = row,
                None => debug!("identifier '{}' not in column '{}', using row 0", identifier, column),
            }
        }
    }

    dataset.record(row_index)
}
