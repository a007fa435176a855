use super::{RangeId, RecordStore, SheetInfo, StoreError};
use crate::highlight::{HighlightError, RowColor, RowHighlighter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

/// Document persisted by [`FileStore`]: the two row ranges plus the last color
/// applied to each fasting row.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    #[serde(default)]
    pub fasting: Vec<Vec<String>>,
    #[serde(default)]
    pub meals: Vec<Vec<String>>,
    #[serde(default)]
    pub highlights: BTreeMap<usize, String>,
}

impl StoreData {
    fn rows(&self, range: RangeId) -> &Vec<Vec<String>> {
        match range {
            RangeId::Fasting => &self.fasting,
            RangeId::Meals => &self.meals,
        }
    }

    fn rows_mut(&mut self, range: RangeId) -> &mut Vec<Vec<String>> {
        match range {
            RangeId::Fasting => &mut self.fasting,
            RangeId::Meals => &mut self.meals,
        }
    }
}

/// Row store kept in a local JSON file, or only in memory when no path is set.
pub struct FileStore {
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl FileStore {
    pub fn in_memory(data: StoreData) -> Self {
        Self {
            path: None,
            data: Mutex::new(data),
        }
    }

    /// Opens the file at `path`; a missing file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = load_data(&path).await?;
        info!(
            path = %path.display(),
            fasting_rows = data.fasting.len(),
            meal_rows = data.meals.len(),
            "loaded file store"
        );
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    pub async fn snapshot(&self) -> StoreData {
        self.data.lock().await.clone()
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            persist_data(path, data).await?;
        }
        Ok(())
    }
}

pub async fn load_data(path: &Path) -> Result<StoreData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreData::default()),
        Err(err) => Err(err.into()),
    }
}

pub async fn persist_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[async_trait]
impl RecordStore for FileStore {
    async fn read_range(&self, range: RangeId) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.data.lock().await.rows(range).clone())
    }

    async fn write_row(
        &self,
        range: RangeId,
        row_index: usize,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let slot = data
            .rows_mut(range)
            .get_mut(row_index)
            .ok_or(StoreError::RowOutOfRange {
                range,
                index: row_index,
            })?;
        *slot = row;
        self.persist(&data).await
    }

    async fn append_row(&self, range: RangeId, row: Vec<String>) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.rows_mut(range).push(row);
        self.persist(&data).await
    }

    async fn sheet_metadata(&self) -> Result<Vec<SheetInfo>, StoreError> {
        Ok(vec![
            SheetInfo {
                id: 0,
                title: "fasting".to_string(),
            },
            SheetInfo {
                id: 1,
                title: "meals".to_string(),
            },
        ])
    }
}

#[async_trait]
impl RowHighlighter for FileStore {
    async fn set_row_color(
        &self,
        range: RangeId,
        row_index: usize,
        status: &str,
    ) -> Result<RowColor, HighlightError> {
        let color = RowColor::for_status(status);
        let mut data = self.data.lock().await;
        if range != RangeId::Fasting || row_index >= data.fasting.len() {
            return Err(StoreError::RowOutOfRange {
                range,
                index: row_index,
            }
            .into());
        }
        data.highlights.insert(row_index, color.name().to_string());
        self.persist(&data).await?;
        debug!(row = row_index, color = color.name(), "row recolored");
        Ok(color)
    }
}
