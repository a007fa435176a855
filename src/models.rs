use crate::locale;
use serde::{Deserialize, Serialize};

/// Status labels as they appear in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastingStatus {
    Planned,
    Completed,
    Skipped,
}

impl FastingStatus {
    pub const ALL: [FastingStatus; 3] = [Self::Planned, Self::Completed, Self::Skipped];

    pub fn label(self) -> &'static str {
        match self {
            Self::Planned => "Naplánovaný",
            Self::Completed => "Dokončený",
            Self::Skipped => "Vynechaný",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Raňajky",
            Self::Lunch => "Obed",
            Self::Dinner => "Večera",
            Self::Snack => "Snack",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|meal_type| meal_type.label() == label)
    }
}

/// One fasting day. Cells are kept verbatim so hand edits in the sheet survive
/// a read-modify-write cycle; typed views go through the locale codec.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingRecord {
    pub date: String,
    pub weekday: String,
    pub fasting_type: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: String,
    pub status: String,
    pub weight_kg: String,
    pub energy_level: String,
    pub note: String,
}

impl FastingRecord {
    pub fn parsed_status(&self) -> Option<FastingStatus> {
        FastingStatus::parse(&self.status)
    }

    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        locale::parse_date(&self.date).ok()
    }

    pub fn duration(&self) -> Option<f64> {
        locale::parse_decimal(&self.duration_hours)
    }

    pub fn weight(&self) -> Option<f64> {
        locale::parse_decimal(&self.weight_kg)
    }

    pub fn is_completed(&self) -> bool {
        self.parsed_status() == Some(FastingStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub date: String,
    pub meal_time: String,
    pub meal_type: String,
    pub name: String,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub note: String,
}

/// Partial update of a fasting day. `None` keeps the stored cell, `Some("")`
/// clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingUpdate {
    pub date: String,
    pub fasting_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_hours: Option<String>,
    pub status: Option<String>,
    pub weight_kg: Option<String>,
    pub energy_level: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDayRequest {
    pub date: String,
    pub completed: bool,
    pub weight_kg: Option<String>,
    pub energy_level: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealRequest {
    pub date: String,
    pub meal_time: String,
    pub meal_type: String,
    pub name: String,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fat: Option<String>,
    pub note: Option<String>,
}

/// JSON envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            period: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TodayPlan {
    Planned {
        exists: bool,
        #[serde(flatten)]
        record: FastingRecord,
    },
    Missing {
        exists: bool,
        date: String,
        message: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDayResponse {
    pub date: String,
    pub status: String,
    pub completed: bool,
    pub color: &'static str,
}

/// Aggregates together with their display forms.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: crate::stats::PeriodStats,
    pub success_rate_display: String,
    pub total_fasting_hours_display: String,
    pub average_fasting_hours_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_fast_display: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSummary {
    pub trend: &'static str,
    pub measurements: usize,
    pub current_weight: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatsReport {
    #[serde(flatten)]
    pub report: StatsReport,
    pub weight: WeightSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    pub date: String,
    pub weight_kg: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightTrendReport {
    pub count: usize,
    pub trend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<String>,
    pub delta: f64,
    pub delta_display: String,
    pub delta_percent: f64,
    pub delta_percent_display: String,
    pub history: Vec<WeightPoint>,
}
