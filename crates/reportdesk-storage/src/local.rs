use crate::traits::{ReportFile, ReportStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reportdesk_core::{check_report_name, OwnerIndex, ReportEntry};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem report store
#[derive(Clone, Debug)]
pub struct LocalReportStore {
    root: PathBuf,
    extension: String,
}

impl LocalReportStore {
    /// Create a new LocalReportStore instance
    ///
    /// # Arguments
    /// * `root` - Flat directory holding the reports (e.g., "/mnt/reports")
    /// * `extension` - Extension that marks a report, including the dot (e.g., ".pdf")
    ///
    /// The directory is never created or written to.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        LocalReportStore {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert a report name to a path directly beneath the root.
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        check_report_name(name).map_err(|reason| StorageError::InvalidName(reason.to_string()))?;
        Ok(self.root.join(name))
    }

    fn is_report_name(&self, name: &str) -> bool {
        name.len() > self.extension.len() && name.ends_with(&self.extension)
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn list_all(&self) -> StorageResult<Vec<ReportEntry>> {
        let start = std::time::Instant::now();

        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            StorageError::ListFailed(format!(
                "Failed to read directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        loop {
            let dir_entry = match dir.next_entry().await {
                Ok(Some(dir_entry)) => dir_entry,
                Ok(None) => break,
                Err(e) => {
                    return Err(StorageError::ListFailed(format!(
                        "Failed to read directory {}: {}",
                        self.root.display(),
                        e
                    )))
                }
            };

            let Ok(name) = dir_entry.file_name().into_string() else {
                continue;
            };
            if !self.is_report_name(&name) {
                continue;
            }

            // Does not follow symlinks
            match dir_entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(report = %name, error = %e, "Skipping report with unreadable file type");
                    continue;
                }
            }

            let metadata = match dir_entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(report = %name, error = %e, "Skipping report with unreadable metadata");
                    continue;
                }
            };

            // Birth time where the filesystem records it, else mtime
            let created = match metadata.created().or_else(|_| metadata.modified()) {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    tracing::warn!(report = %name, error = %e, "Skipping report without a timestamp");
                    continue;
                }
            };

            entries.push(ReportEntry::new(name, created));
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            path = %self.root.display(),
            count = entries.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local report listing complete"
        );

        Ok(entries)
    }

    async fn open(&self, name: &str) -> StorageResult<ReportFile> {
        let path = self.name_to_path(name)?;
        let start = std::time::Instant::now();

        if !self.is_report_name(name) {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to stat file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let reader = tokio_util::io::ReaderStream::new(file);

        let report = name.to_string();
        let stream = reader.map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    report = %report,
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local report stream error"
                );
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        tracing::debug!(
            path = %path.display(),
            size_bytes = metadata.len(),
            "Local report opened"
        );

        Ok(ReportFile {
            name: name.to_string(),
            size: metadata.len(),
            stream: Box::pin(stream),
        })
    }

    async fn load_owner_index(&self, file_name: &str) -> StorageResult<OwnerIndex> {
        let path = self
            .name_to_path(file_name)
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "Owner index not found, no report is visible"
                );
                return Ok(OwnerIndex::default());
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read owner index {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let owners: HashMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::IndexMalformed(format!("{}: {}", path.display(), e)))?;

        Ok(OwnerIndex::new(owners))
    }

    async fn probe(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        fs::read_dir(&self.root).await?;
        Ok(())
    }
}
