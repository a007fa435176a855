use crate::errors::AppError;
use crate::locale::{self, format_decimal, format_decimal_fixed, format_signed};
use crate::models::{
    ApiResponse, FastingRecord, FastingUpdate, GlobalStatsReport, HealthResponse, MarkDayRequest,
    MarkDayResponse, MealRecord, NewMealRequest, StatsReport, TodayPlan, WeightPoint,
    WeightSummary, WeightTrendReport,
};
use crate::state::AppState;
use crate::stats::PeriodStats;
use crate::trend::TrendResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{Local, NaiveDate, Utc};

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339(),
        service: "Fasting Plan Manager API",
    })
}

pub async fn list_fasting(State(state): State<AppState>) -> ApiResult<Vec<FastingRecord>> {
    let records = state.log.fasting_records().await?;
    let count = records.len();
    Ok(Json(ApiResponse::ok(records).with_count(count)))
}

pub async fn get_fasting(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<FastingRecord> {
    let record = state.log.find_day(&date).await?;
    Ok(Json(ApiResponse::ok(record)))
}

pub async fn update_fasting(
    State(state): State<AppState>,
    payload: Result<Json<FastingUpdate>, JsonRejection>,
) -> ApiResult<FastingRecord> {
    let Json(update) = payload.map_err(rejected)?;
    let record = state.log.update_day(&update).await?;
    let message = format!("record for {} updated", record.date);
    Ok(Json(ApiResponse::ok(record).with_message(message)))
}

pub async fn list_meals(State(state): State<AppState>) -> ApiResult<Vec<MealRecord>> {
    let meals = state.log.meals().await?;
    let count = meals.len();
    Ok(Json(ApiResponse::ok(meals).with_count(count)))
}

pub async fn add_meal(
    State(state): State<AppState>,
    payload: Result<Json<NewMealRequest>, JsonRejection>,
) -> ApiResult<MealRecord> {
    let Json(request) = payload.map_err(rejected)?;
    let meal = state.log.add_meal(&request).await?;
    let message = format!("meal {} added on {} at {}", meal.name, meal.date, meal.meal_time);
    Ok(Json(ApiResponse::ok(meal).with_message(message)))
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<GlobalStatsReport> {
    let (stats, trend) = state.log.global_stats().await?;
    Ok(Json(ApiResponse::ok(GlobalStatsReport {
        report: stats_report(stats),
        weight: weight_summary(&trend),
    })))
}

pub async fn get_weekly(State(state): State<AppState>) -> ApiResult<StatsReport> {
    let (period, stats) = state.log.weekly_stats(today()).await?;
    Ok(Json(ApiResponse::ok(stats_report(stats)).with_period(period.label())))
}

pub async fn get_monthly(State(state): State<AppState>) -> ApiResult<StatsReport> {
    let (period, stats) = state.log.monthly_stats(today()).await?;
    Ok(Json(ApiResponse::ok(stats_report(stats)).with_period(period.label())))
}

pub async fn get_weight_trend(State(state): State<AppState>) -> ApiResult<WeightTrendReport> {
    let trend = state.log.weight_trend().await?;
    Ok(Json(ApiResponse::ok(weight_report(&trend))))
}

pub async fn get_today(State(state): State<AppState>) -> ApiResult<TodayPlan> {
    let today = today();
    let plan = match state.log.day_at(today).await? {
        Some(record) => TodayPlan::Planned {
            exists: true,
            record,
        },
        None => {
            let date = locale::format_date(today);
            TodayPlan::Missing {
                exists: false,
                message: format!("no fasting is planned for today ({date})"),
                date,
            }
        }
    };
    Ok(Json(ApiResponse::ok(plan)))
}

pub async fn mark_day(
    State(state): State<AppState>,
    payload: Result<Json<MarkDayRequest>, JsonRejection>,
) -> ApiResult<MarkDayResponse> {
    let Json(request) = payload.map_err(rejected)?;
    let (record, color) = state.log.mark_day(&request).await?;
    let message = if request.completed {
        format!("day {} marked as completed", record.date)
    } else {
        format!("day {} marked as skipped", record.date)
    };
    Ok(Json(
        ApiResponse::ok(MarkDayResponse {
            date: record.date,
            status: record.status,
            completed: request.completed,
            color: color.map_or("unchanged", |color| color.name()),
        })
        .with_message(message),
    ))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("endpoint not found".to_string())
}

fn rejected(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn stats_report(stats: PeriodStats) -> StatsReport {
    StatsReport {
        success_rate_display: format!("{}%", format_decimal_fixed(stats.success_rate, 1)),
        total_fasting_hours_display: format_decimal_fixed(stats.total_fasting_hours, 1),
        average_fasting_hours_display: format!(
            "{} h",
            format_decimal_fixed(stats.average_fasting_hours, 1)
        ),
        longest_fast_display: stats.longest_fast_hours.map(format_decimal),
        stats,
    }
}

fn kilograms(weight: f64) -> String {
    format!("{} kg", format_decimal(weight))
}

fn weight_summary(trend: &TrendResult) -> WeightSummary {
    WeightSummary {
        trend: trend.trend.label(),
        measurements: trend.count(),
        current_weight: trend.last().map(|sample| kilograms(sample.weight_kg)),
    }
}

fn weight_report(trend: &TrendResult) -> WeightTrendReport {
    WeightTrendReport {
        count: trend.count(),
        trend: trend.trend.label(),
        first_weight: trend.first().map(|sample| kilograms(sample.weight_kg)),
        first_date: trend.first().map(|sample| sample.date_label.clone()),
        current_weight: trend.last().map(|sample| kilograms(sample.weight_kg)),
        last_date: trend.last().map(|sample| sample.date_label.clone()),
        delta: trend.delta,
        delta_display: format!("{} kg", format_signed(trend.delta)),
        delta_percent: trend.delta_percent,
        delta_percent_display: format!("{}%", format_signed(trend.delta_percent)),
        history: trend
            .history
            .iter()
            .map(|sample| WeightPoint {
                date: sample.date_label.clone(),
                weight_kg: format_decimal(sample.weight_kg),
            })
            .collect(),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
