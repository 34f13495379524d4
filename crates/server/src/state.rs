use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use bookshelf_core::{BookCatalog, CatalogError, Config, LoadOutcome};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn BookCatalog>,
    /// Result of the most recent load of the backing file.
    load_outcome: Mutex<LoadOutcome>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn BookCatalog>, load_outcome: LoadOutcome) -> Self {
        Self {
            config,
            catalog,
            load_outcome: Mutex::new(load_outcome),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &dyn BookCatalog {
        self.catalog.as_ref()
    }

    pub fn catalog_path(&self) -> &Path {
        &self.config.storage.path
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the backing file and remember the outcome.
    pub fn reload(&self) -> Result<LoadOutcome, CatalogError> {
        let outcome = self.catalog.load()?;
        *self
            .load_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = outcome.clone();
        Ok(outcome)
    }
}
