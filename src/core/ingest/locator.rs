//! Input document discovery
//!
//! A [`DocumentLocator`] yields the single export file an ingestion run
//! should read, or [`IngestError::InputNotFound`] when there is none.

use crate::config::InputConfig;
use crate::domain::{IngestError, PosloadError, Result};
use async_trait::async_trait;
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Source of the next document to ingest
#[async_trait]
pub trait DocumentLocator: Send + Sync {
    async fn locate(&self) -> std::result::Result<PathBuf, IngestError>;
}

/// Picks the first file in a directory whose name matches a glob pattern
///
/// The pattern uses shell glob syntax (`*`, `?`, `[...]`) and is matched
/// against file names only. Matches are ordered by file name.
#[derive(Debug, Clone)]
pub struct InputDirectory {
    directory: PathBuf,
    pattern: Pattern,
}

impl InputDirectory {
    /// # Errors
    ///
    /// Returns a configuration error if the pattern cannot be compiled.
    pub fn new(directory: impl Into<PathBuf>, file_pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(file_pattern).map_err(|e| {
            PosloadError::Configuration(format!("Invalid file pattern '{file_pattern}': {e}"))
        })?;

        Ok(Self {
            directory: directory.into(),
            pattern,
        })
    }

    pub fn from_config(config: &InputConfig) -> Result<Self> {
        Self::new(&config.directory, &config.file_pattern)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }

    /// All matching files, sorted by name
    pub async fn candidates(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.matches(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names.into_iter().map(|n| self.directory.join(n)).collect())
    }
}

#[async_trait]
impl DocumentLocator for InputDirectory {
    async fn locate(&self) -> std::result::Result<PathBuf, IngestError> {
        let not_found = || IngestError::InputNotFound {
            location: self.directory.clone(),
        };

        let candidates = self.candidates().await.map_err(|e| {
            tracing::debug!(
                directory = %self.directory.display(),
                error = %e,
                "Input directory not readable"
            );
            not_found()
        })?;

        if candidates.len() > 1 {
            tracing::debug!(
                candidates = candidates.len(),
                "Several input documents match; taking the first by name"
            );
        }

        candidates.into_iter().next().ok_or_else(not_found)
    }
}

/// A single explicitly named document
#[derive(Debug, Clone)]
pub struct FixedDocument {
    path: PathBuf,
}

impl FixedDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentLocator for FixedDocument {
    async fn locate(&self) -> std::result::Result<PathBuf, IngestError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(self.path.clone()),
            _ => Err(IngestError::InputNotFound {
                location: self.path.clone(),
            }),
        }
    }
}
