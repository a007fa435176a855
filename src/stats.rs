use crate::locale::{self, round1};
use crate::models::{FastingRecord, FastingStatus};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub record_count: usize,
    pub completed_count: usize,
    pub skipped_count: usize,
    pub planned_count: usize,
    pub success_rate: f64,
    pub total_fasting_hours: f64,
    pub average_fasting_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_fast_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_fast_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            locale::format_date(self.start),
            locale::format_date(self.end)
        )
    }
}

pub fn compute_global_stats(records: &[FastingRecord]) -> PeriodStats {
    aggregate(records.iter(), false)
}

pub fn compute_period_stats(records: &[FastingRecord], period: Period) -> PeriodStats {
    aggregate(in_period(records, period), false)
}

/// Period stats plus the longest completed fast of the period.
pub fn compute_monthly_stats(records: &[FastingRecord], period: Period) -> PeriodStats {
    aggregate(in_period(records, period), true)
}

fn in_period(records: &[FastingRecord], period: Period) -> impl Iterator<Item = &FastingRecord> {
    records
        .iter()
        .filter(move |record| record.parsed_date().is_some_and(|date| period.contains(date)))
}

fn aggregate<'a>(
    records: impl Iterator<Item = &'a FastingRecord>,
    track_longest: bool,
) -> PeriodStats {
    let mut record_count = 0usize;
    let mut completed_count = 0usize;
    let mut skipped_count = 0usize;
    let mut total_hours = 0.0f64;
    let mut summed = 0usize;
    let mut longest: Option<(f64, &str)> = None;

    for record in records {
        record_count += 1;
        match record.parsed_status() {
            Some(FastingStatus::Completed) => completed_count += 1,
            Some(FastingStatus::Skipped) => skipped_count += 1,
            _ => {}
        }

        if !record.is_completed() {
            continue;
        }
        let Some(hours) = record.duration() else {
            continue;
        };
        total_hours += hours;
        summed += 1;
        if longest.is_none_or(|(max, _)| hours > max) {
            longest = Some((hours, record.date.as_str()));
        }
    }

    let success_rate = if record_count == 0 {
        0.0
    } else {
        round1(completed_count as f64 / record_count as f64 * 100.0)
    };
    let average_fasting_hours = if summed == 0 {
        0.0
    } else {
        round1(total_hours / summed as f64)
    };
    let (longest_fast_hours, longest_fast_date) = match (track_longest, longest) {
        (true, Some((hours, date))) => (Some(hours), Some(date.to_string())),
        (true, None) => (Some(0.0), Some(String::new())),
        (false, _) => (None, None),
    };

    PeriodStats {
        record_count,
        completed_count,
        skipped_count,
        planned_count: record_count - completed_count - skipped_count,
        success_rate,
        total_fasting_hours: round1(total_hours),
        average_fasting_hours,
        longest_fast_hours,
        longest_fast_date,
    }
}

/// Monday through Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> Period {
    let start = week_start(today);
    Period {
        start,
        end: start + Duration::days(6),
    }
}

/// First through last calendar day of `today`'s month.
pub fn month_bounds(today: NaiveDate) -> Period {
    let start = today.with_day(1).unwrap_or(today);
    let next_month = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };
    let end = next_month
        .and_then(|first| first.pred_opt())
        .unwrap_or(today);
    Period { start, end }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
