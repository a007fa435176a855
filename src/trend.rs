use crate::locale::round1;
use crate::models::FastingRecord;
use chrono::NaiveDate;

/// Changes within this many kilograms count as stable.
const STABLE_BAND_KG: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightSample {
    pub date: NaiveDate,
    /// Date cell as written in the sheet.
    pub date_label: String,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightTrend {
    NoData,
    Decreasing,
    Increasing,
    Stable,
}

impl WeightTrend {
    pub fn classify(delta: f64) -> Self {
        if delta < -STABLE_BAND_KG {
            Self::Decreasing
        } else if delta > STABLE_BAND_KG {
            Self::Increasing
        } else {
            Self::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoData => "no data",
            Self::Decreasing => "decreasing (favorable)",
            Self::Increasing => "increasing",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub trend: WeightTrend,
    pub delta: f64,
    pub delta_percent: f64,
    /// Samples in chronological order.
    pub history: Vec<WeightSample>,
}

impl TrendResult {
    pub fn count(&self) -> usize {
        self.history.len()
    }

    pub fn first(&self) -> Option<&WeightSample> {
        self.history.first()
    }

    pub fn last(&self) -> Option<&WeightSample> {
        self.history.last()
    }
}

/// Weight measurements sorted by date; rows without a usable weight or date are
/// left out. Equal dates keep their row order.
pub fn weight_samples(records: &[FastingRecord]) -> Vec<WeightSample> {
    let mut samples: Vec<WeightSample> = records
        .iter()
        .filter_map(|record| {
            Some(WeightSample {
                weight_kg: record.weight()?,
                date: record.parsed_date()?,
                date_label: record.date.clone(),
            })
        })
        .collect();
    samples.sort_by_key(|sample| sample.date);
    samples
}

pub fn analyze_trend(records: &[FastingRecord]) -> TrendResult {
    let history = weight_samples(records);
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return TrendResult {
            trend: WeightTrend::NoData,
            delta: 0.0,
            delta_percent: 0.0,
            history,
        };
    };

    let delta = last.weight_kg - first.weight_kg;
    let delta_percent = if first.weight_kg == 0.0 {
        0.0
    } else {
        round1(delta / first.weight_kg * 100.0)
    };
    TrendResult {
        trend: WeightTrend::classify(delta),
        delta: round1(delta),
        delta_percent,
        history,
    }
}
