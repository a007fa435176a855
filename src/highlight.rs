use crate::models::FastingStatus;
use crate::store::{RangeId, StoreError};
use async_trait::async_trait;
use serde::Serialize;

/// Background color in the 0.0..=1.0 channel scale the Sheets API uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl RowColor {
    pub const LIGHT_GREEN: Self = Self::rgb(0.8, 1.0, 0.8);
    pub const LIGHT_RED: Self = Self::rgb(1.0, 0.8, 0.8);
    pub const LIGHT_YELLOW: Self = Self::rgb(1.0, 1.0, 0.8);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Color for a status cell; unknown and empty labels map to white.
    pub fn for_status(status: &str) -> Self {
        match FastingStatus::parse(status) {
            Some(FastingStatus::Completed) => Self::LIGHT_GREEN,
            Some(FastingStatus::Skipped) => Self::LIGHT_RED,
            Some(FastingStatus::Planned) => Self::LIGHT_YELLOW,
            None => Self::WHITE,
        }
    }

    pub fn name(self) -> &'static str {
        if self == Self::LIGHT_GREEN {
            "light green"
        } else if self == Self::LIGHT_RED {
            "light red"
        } else if self == Self::LIGHT_YELLOW {
            "light yellow"
        } else {
            "white"
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("sheet '{0}' not found in spreadsheet metadata")]
    SheetMissing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Recolors a data row after its status changed. Callers treat failures as
/// non-fatal.
#[async_trait]
pub trait RowHighlighter: Send + Sync {
    async fn set_row_color(
        &self,
        range: RangeId,
        row_index: usize,
        status: &str,
    ) -> Result<RowColor, HighlightError>;
}
