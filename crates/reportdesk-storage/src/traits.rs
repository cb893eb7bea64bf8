//! Report store abstraction trait
//!
//! This module defines the ReportStore trait that all report backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reportdesk_core::{OwnerIndex, ReportEntry};
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Invalid report name: {0}")]
    InvalidName(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Owner index is malformed: {0}")]
    IndexMalformed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream of a report body.
pub type ReportStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An opened report, ready to be streamed.
///
/// The underlying file handle lives inside `stream` and is released when the stream is
/// dropped, whether it was read to the end or not.
pub struct ReportFile {
    pub name: String,
    pub size: u64,
    pub stream: ReportStream,
}

impl fmt::Debug for ReportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Report store abstraction trait
///
/// Implementations read a flat collection of report files. Nothing is cached: every call
/// observes the current contents of the backend.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Every report carrying the configured extension, sorted by name.
    ///
    /// Fails only if the collection itself cannot be read; a report whose metadata cannot be
    /// read is skipped.
    async fn list_all(&self) -> StorageResult<Vec<ReportEntry>>;

    /// Open a report for streaming.
    ///
    /// Returns `NotFound` when the name lacks the configured extension or no regular file of
    /// that name exists.
    async fn open(&self, name: &str) -> StorageResult<ReportFile>;

    /// Load the owner index stored under `file_name`. A missing index is empty.
    async fn load_owner_index(&self, file_name: &str) -> StorageResult<OwnerIndex>;

    /// Check that the backend is reachable and readable
    async fn probe(&self) -> StorageResult<()>;
}
