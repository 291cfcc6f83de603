//! Wiring of store, classifier and pipeline from configuration.

use crate::config::SiftConfig;
use crate::error::Result;
use sift_engine::{Pipeline, RedundancyClassifier};
use sift_gatekeeper::Gatekeeper;
use sift_store::SqliteStore;
use std::fs;
use std::sync::Arc;

/// Pipeline over a shared SQLite store, which also receives audit records.
pub type SiftPipeline = Pipeline<Gatekeeper, Arc<SqliteStore>, Arc<SqliteStore>>;

/// Components shared by the commands.
pub struct App {
    store: Arc<SqliteStore>,
    pipeline: Arc<SiftPipeline>,
}

impl App {
    /// Open the configured database.
    pub fn open(config: &SiftConfig) -> Result<Self> {
        let path = &config.database.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let store = SqliteStore::with_timeout(path, config.database.timeout())?;
        tracing::debug!(path = %path.display(), "Opened entry store");
        Ok(Self::with_store(store, config))
    }

    /// Use a throwaway in-memory database.
    pub fn in_memory(config: &SiftConfig) -> Result<Self> {
        Ok(Self::with_store(SqliteStore::in_memory()?, config))
    }

    fn with_store(store: SqliteStore, config: &SiftConfig) -> Self {
        let engine = config.engine_config();
        let store = Arc::new(store);
        let classifier =
            RedundancyClassifier::new(Arc::clone(&store), Arc::clone(&store), &engine.detection);
        let pipeline = Pipeline::new(Gatekeeper::new(engine.validation), classifier, engine.batch);
        Self {
            store,
            pipeline: Arc::new(pipeline),
        }
    }

    /// The entry store.
    pub fn store(&self) -> &Arc<SqliteStore> {
        &self.store
    }

    /// The ingestion pipeline.
    pub fn pipeline(&self) -> &Arc<SiftPipeline> {
        &self.pipeline
    }
}
