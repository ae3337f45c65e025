use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, warn};

use crate::core::error::StoryError;
use crate::data::records::TableKind;

/// Where raw table text comes from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the raw CSV text of a table
    async fn fetch(&self, table: TableKind) -> Result<String, StoryError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Reads tables from a directory of CSV files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Open a data directory.
    ///
    /// A missing directory is tolerated (every table then fails on its own),
    /// but a path that exists and is not a directory is an initialization error.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoryError> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() && !dir.is_dir() {
            return Err(StoryError::InitializationError(format!(
                "data path {} is not a directory",
                dir.display()
            )));
        }
        if !dir.exists() {
            warn!("Data directory {} does not exist", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn path_for(&self, table: TableKind) -> PathBuf {
        self.dir.join(table.file_name())
    }
}

#[async_trait]
impl TableSource for DirectorySource {
    async fn fetch(&self, table: TableKind) -> Result<String, StoryError> {
        let path = self.path_for(table);
        debug!("Reading {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoryError::SourceError(format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
