use crate::day_status;
use crate::errors::AppError;
use crate::highlight::{RowColor, RowHighlighter};
use crate::layout;
use crate::locale;
use crate::merge;
use crate::models::{FastingRecord, FastingUpdate, MarkDayRequest, MealRecord, MealType, NewMealRequest};
use crate::stats::{self, Period, PeriodStats};
use crate::store::{RangeId, RecordStore};
use crate::trend::{self, TrendResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Request-scoped operations over the fasting and meal logs.
///
/// Every call reads the store afresh; nothing is cached between requests.
/// Updates to the same day from concurrent requests are last-write-wins.
#[derive(Clone)]
pub struct FastingLog {
    store: Arc<dyn RecordStore>,
    highlighter: Arc<dyn RowHighlighter>,
}

impl FastingLog {
    pub fn new(store: Arc<dyn RecordStore>, highlighter: Arc<dyn RowHighlighter>) -> Self {
        Self { store, highlighter }
    }

    pub async fn fasting_records(&self) -> Result<Vec<FastingRecord>, AppError> {
        let rows = self
            .store
            .read_range(RangeId::Fasting)
            .await
            .map_err(AppError::upstream("failed to load fasting records"))?;
        Ok(layout::fasting_records(&rows))
    }

    pub async fn find_day(&self, date: &str) -> Result<FastingRecord, AppError> {
        locale::parse_date(date)?;
        self.fasting_records()
            .await?
            .into_iter()
            .find(|record| record.date == date)
            .ok_or_else(|| AppError::NotFound(format!("no record for {date}")))
    }

    pub async fn day_at(&self, today: NaiveDate) -> Result<Option<FastingRecord>, AppError> {
        let date = locale::format_date(today);
        Ok(self
            .fasting_records()
            .await?
            .into_iter()
            .find(|record| record.date == date))
    }

    pub async fn update_day(&self, update: &FastingUpdate) -> Result<FastingRecord, AppError> {
        let (record, _) = self.commit(update).await?;
        Ok(record)
    }

    /// Marks a day completed or skipped. The returned color is `None` when the
    /// recolor failed.
    pub async fn mark_day(
        &self,
        request: &MarkDayRequest,
    ) -> Result<(FastingRecord, Option<RowColor>), AppError> {
        self.commit(&day_status::as_update(request)).await
    }

    /// Validates before touching the store, then writes the merged row and
    /// recolors it for its final status.
    async fn commit(
        &self,
        update: &FastingUpdate,
    ) -> Result<(FastingRecord, Option<RowColor>), AppError> {
        merge::validate_update(update)?;
        let records = self.fasting_records().await?;
        let (index, merged) = merge::apply_update(&records, update)?;
        self.save_day(index, &merged).await?;
        let color = self.highlight(index, &merged.status).await;
        Ok((merged, color))
    }

    async fn save_day(&self, index: usize, record: &FastingRecord) -> Result<(), AppError> {
        self.store
            .write_row(RangeId::Fasting, index, record.to_row())
            .await
            .map_err(AppError::upstream("failed to save fasting record"))?;
        info!(date = %record.date, status = %record.status, "fasting record updated");
        Ok(())
    }

    /// Recolors the row for its final status. Failures are logged and never
    /// reach the caller.
    async fn highlight(&self, index: usize, status: &str) -> Option<RowColor> {
        match self
            .highlighter
            .set_row_color(RangeId::Fasting, index, status)
            .await
        {
            Ok(color) => Some(color),
            Err(err) => {
                warn!(row = index, error = %err, "failed to recolor fasting row");
                None
            }
        }
    }

    pub async fn meals(&self) -> Result<Vec<MealRecord>, AppError> {
        let rows = self
            .store
            .read_range(RangeId::Meals)
            .await
            .map_err(AppError::upstream("failed to load meals"))?;
        Ok(layout::meal_records(&rows))
    }

    pub async fn add_meal(&self, request: &NewMealRequest) -> Result<MealRecord, AppError> {
        let meal = new_meal_record(request)?;
        self.store
            .append_row(RangeId::Meals, meal.to_row())
            .await
            .map_err(AppError::upstream("failed to save meal"))?;
        info!(date = %meal.date, time = %meal.meal_time, name = %meal.name, "meal added");
        Ok(meal)
    }

    pub async fn global_stats(&self) -> Result<(PeriodStats, TrendResult), AppError> {
        let records = self.fasting_records().await?;
        Ok((
            stats::compute_global_stats(&records),
            trend::analyze_trend(&records),
        ))
    }

    pub async fn weekly_stats(&self, today: NaiveDate) -> Result<(Period, PeriodStats), AppError> {
        let period = stats::week_bounds(today);
        let records = self.fasting_records().await?;
        Ok((period, stats::compute_period_stats(&records, period)))
    }

    pub async fn monthly_stats(&self, today: NaiveDate) -> Result<(Period, PeriodStats), AppError> {
        let period = stats::month_bounds(today);
        let records = self.fasting_records().await?;
        Ok((period, stats::compute_monthly_stats(&records, period)))
    }

    pub async fn weight_trend(&self) -> Result<TrendResult, AppError> {
        Ok(trend::analyze_trend(&self.fasting_records().await?))
    }
}

fn new_meal_record(request: &NewMealRequest) -> Result<MealRecord, AppError> {
    locale::parse_date(&request.date)?;
    locale::parse_time(&request.meal_time)?;
    if MealType::parse(&request.meal_type).is_none() {
        let allowed: Vec<&str> = MealType::ALL.iter().map(|t| t.label()).collect();
        return Err(AppError::bad_request(format!(
            "meal type must be one of: {}",
            allowed.join(", ")
        )));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::bad_request("meal name is required"));
    }

    let optional = |field: &Option<String>| field.clone().unwrap_or_default();
    Ok(MealRecord {
        date: request.date.clone(),
        meal_time: request.meal_time.clone(),
        meal_type: request.meal_type.clone(),
        name: request.name.clone(),
        calories: optional(&request.calories),
        protein: optional(&request.protein),
        carbs: optional(&request.carbs),
        fat: optional(&request.fat),
        note: optional(&request.note),
    })
}
