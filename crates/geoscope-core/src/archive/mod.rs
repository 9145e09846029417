//! Local archive of completed analyses.
//!
//! The analysis service keeps its own history, but it is only reachable when
//! a backend is configured. The archive keeps a copy of every analysis this
//! client completed so results can be listed, searched and re-rendered
//! offline, including in demo mode.
//!
//! Each operation opens its own connection on the blocking thread pool.
//!
//! ```rust,no_run
//! use geoscope_core::ArchiveBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = ArchiveBuilder::new()
//!     .with_database_path(Some("analyses.db"))
//!     .build()
//!     .await?;
//!
//! for row in archive.recent(None, 10).await? {
//!     println!("{} {}", row.entry.analysis_id, row.entry.query);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use crate::{
    db::{analysis_queries::ArchivedEntry, Database},
    error::{GeoscopeError, Result},
    models::AnalysisResult,
};

pub mod builder;

pub use builder::ArchiveBuilder;

/// Async handle to the archive database.
#[derive(Debug, Clone)]
pub struct Archive {
    db_path: PathBuf,
}

impl Archive {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| GeoscopeError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Stores a completed analysis.
    pub async fn save(&self, result: &AnalysisResult) -> Result<ArchivedEntry> {
        let result = result.clone();
        let entry = self.with_db(move |db| db.save_analysis(&result)).await?;
        debug!("Archived analysis {}", entry.entry.analysis_id);
        Ok(entry)
    }

    /// Retrieves a stored analysis by id.
    ///
    /// # Errors
    ///
    /// Returns `GeoscopeError::AnalysisNotFound` if no analysis has that id.
    pub async fn get(&self, id: &str) -> Result<AnalysisResult> {
        let key = id.to_string();
        self.with_db(move |db| db.get_analysis(&key))
            .await?
            .ok_or_else(|| GeoscopeError::AnalysisNotFound { id: id.to_string() })
    }

    /// Lists stored analyses, newest first.
    pub async fn recent(&self, brand: Option<&str>, limit: u32) -> Result<Vec<ArchivedEntry>> {
        let brand = brand.map(String::from);
        self.with_db(move |db| db.recent_analyses(brand.as_deref(), limit))
            .await
    }

    /// Searches stored analyses by query, brand or summary text.
    pub async fn search(&self, text: &str, limit: u32) -> Result<Vec<ArchivedEntry>> {
        let text = text.to_string();
        self.with_db(move |db| db.search_analyses(&text, limit)).await
    }

    /// Deletes every stored analysis.
    pub async fn clear(&self) -> Result<usize> {
        self.with_db(Database::clear_analyses).await
    }
}
