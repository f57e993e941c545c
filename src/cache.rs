//! Process-wide memo of loaded datasets, keyed by the exact locator string.
//!
//! Entries live for the lifetime of the process: there is no invalidation
//! and no TTL. Concurrent loads of one key share a single fetch; a failed
//! load leaves the slot empty so the next request tries again.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::loader::DatasetLoader;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

pub struct DatasetCache {
    loader: DatasetLoader,
    entries: DashMap<String, Arc<OnceCell<Arc<Dataset>>>>,
}

impl DatasetCache {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            entries: DashMap::new(),
        }
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    pub async fn get_or_load(&self, locator: &str) -> Result<Arc<Dataset>> {
        // Clone the cell out so the map shard is not locked across the await
        let cell = self
            .entries
            .entry(locator.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(ds) = cell.get() {
            debug!("Cache hit for '{}'", locator);
            return Ok(ds.clone());
        }

        match cell
            .get_or_try_init(|| async { self.loader.load(locator).await.map(Arc::new) })
            .await
        {
            Ok(ds) => Ok(ds.clone()),
            Err(e) => {
                // Drop the empty slot so failed locators do not accumulate
                self.entries.remove_if(locator, |_, cell| !cell.initialized());
                Err(e)
            }
        }
    }

    /// True when `locator` has a loaded dataset.
    pub fn contains(&self, locator: &str) -> bool {
        self.entries
            .get(locator)
            .map_or(false, |cell| cell.initialized())
    }

    /// Number of loaded datasets.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
