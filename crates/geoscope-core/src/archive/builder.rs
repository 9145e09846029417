//! Builder for creating and configuring Archive instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Archive;
use crate::{
    db::Database,
    error::{GeoscopeError, Result},
};

/// Builder for creating and configuring Archive instances.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    database_path: Option<PathBuf>,
}

impl ArchiveBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/geoscope/geoscope.db` or `~/.local/share/geoscope/geoscope.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the archive, creating the database file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `GeoscopeError::FileSystem` if the database directory cannot be created
    /// Returns `GeoscopeError::Database` if database initialization fails
    pub async fn build(self) -> Result<Archive> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GeoscopeError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), GeoscopeError>(())
        })
        .await
        .map_err(|e| GeoscopeError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Archive::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("geoscope")
            .place_data_file("geoscope.db")
            .map_err(|e| GeoscopeError::XdgDirectory(e.to_string()))
    }
}
