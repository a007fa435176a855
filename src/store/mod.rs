//! Row storage behind the fasting and meal logs.
//!
//! The spreadsheet is treated as an opaque row store: ranges are read whole,
//! single rows are overwritten in place or appended.

mod auth;
pub mod file;
pub mod sheets;

pub use file::{FileStore, StoreData};
pub use sheets::SheetsStore;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeId {
    Fasting,
    Meals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to the spreadsheet service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("spreadsheet service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid request url {0}")]
    Url(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode stored data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("row {index} is outside the {range:?} range")]
    RowOutOfRange { range: RangeId, index: usize },
}

/// Row-level access to the backing spreadsheet.
///
/// `row_index` is the 0-based offset of a row inside the data range returned
/// by [`RecordStore::read_range`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read_range(&self, range: RangeId) -> Result<Vec<Vec<String>>, StoreError>;

    async fn write_row(
        &self,
        range: RangeId,
        row_index: usize,
        row: Vec<String>,
    ) -> Result<(), StoreError>;

    async fn append_row(&self, range: RangeId, row: Vec<String>) -> Result<(), StoreError>;

    async fn sheet_metadata(&self) -> Result<Vec<SheetInfo>, StoreError>;
}
