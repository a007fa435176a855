use crate::locale;
use crate::models::{FastingRecord, FastingStatus, FastingUpdate};

pub const MIN_WEIGHT_KG: f64 = 40.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MIN_ENERGY: i64 = 1;
pub const MAX_ENERGY: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("{0}")]
    Invalid(String),
    #[error("day {0} was not found in the plan, create it in the source sheet first")]
    NotFound(String),
}

impl From<locale::FormatError> for MergeError {
    fn from(err: locale::FormatError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Checks every supplied field before the store is touched.
///
/// An empty string is a valid value for any optional field and clears the
/// stored cell.
pub fn validate_update(update: &FastingUpdate) -> Result<(), MergeError> {
    locale::parse_date(&update.date)?;

    if let Some(start) = supplied(&update.start_time) {
        locale::parse_time(start)?;
    }
    if let Some(end) = supplied(&update.end_time) {
        locale::parse_time(end)?;
    }
    if let Some(status) = supplied(&update.status) {
        if FastingStatus::parse(status).is_none() {
            let allowed: Vec<&str> = FastingStatus::ALL.iter().map(|s| s.label()).collect();
            return Err(MergeError::Invalid(format!(
                "status must be one of: {}",
                allowed.join(", ")
            )));
        }
    }
    if let Some(weight) = supplied(&update.weight_kg) {
        validate_weight(weight)?;
    }
    if let Some(energy) = supplied(&update.energy_level) {
        validate_energy(energy)?;
    }
    Ok(())
}

pub fn validate_weight(input: &str) -> Result<f64, MergeError> {
    match locale::parse_decimal(input) {
        Some(weight) if (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight) => Ok(weight),
        _ => Err(MergeError::Invalid(format!(
            "weight must be between {MIN_WEIGHT_KG} and {MAX_WEIGHT_KG} kg"
        ))),
    }
}

pub fn validate_energy(input: &str) -> Result<i64, MergeError> {
    match input.trim().parse::<i64>() {
        Ok(energy) if (MIN_ENERGY..=MAX_ENERGY).contains(&energy) => Ok(energy),
        _ => Err(MergeError::Invalid(format!(
            "energy level must be between {MIN_ENERGY} and {MAX_ENERGY}"
        ))),
    }
}

fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn pick(update: &Option<String>, existing: &str) -> String {
    update.clone().unwrap_or_else(|| existing.to_string())
}

/// Overlays the supplied fields onto `existing`. `weekday` is never touched.
pub fn merge(existing: &FastingRecord, update: &FastingUpdate) -> FastingRecord {
    FastingRecord {
        date: existing.date.clone(),
        weekday: existing.weekday.clone(),
        fasting_type: pick(&update.fasting_type, &existing.fasting_type),
        start_time: pick(&update.start_time, &existing.start_time),
        end_time: pick(&update.end_time, &existing.end_time),
        duration_hours: pick(&update.duration_hours, &existing.duration_hours),
        status: pick(&update.status, &existing.status),
        weight_kg: pick(&update.weight_kg, &existing.weight_kg),
        energy_level: pick(&update.energy_level, &existing.energy_level),
        note: pick(&update.note, &existing.note),
    }
}

/// Finds the day addressed by `update` and returns its row offset together
/// with the merged record. The first row carrying the date wins.
pub fn apply_update(
    records: &[FastingRecord],
    update: &FastingUpdate,
) -> Result<(usize, FastingRecord), MergeError> {
    let (index, existing) = records
        .iter()
        .enumerate()
        .find(|(_, record)| record.date == update.date)
        .ok_or_else(|| MergeError::NotFound(update.date.clone()))?;
    Ok((index, merge(existing, update)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned_day() -> FastingRecord {
        FastingRecord {
            date: "06.01.2025".into(),
            weekday: "Pondelok".into(),
            fasting_type: "16:8".into(),
            start_time: "20:00".into(),
            end_time: "12:00".into(),
            duration_hours: "16".into(),
            status: "Naplánovaný".into(),
            weight_kg: "81,2".into(),
            energy_level: "6".into(),
            note: "plan".into(),
        }
    }

    fn update_for(date: &str) -> FastingUpdate {
        FastingUpdate {
            date: date.into(),
            ..FastingUpdate::default()
        }
    }

    #[test]
    fn merge_is_field_local() {
        let existing = planned_day();
        let update = FastingUpdate {
            weight_kg: Some("80,4".into()),
            ..update_for("06.01.2025")
        };

        let merged = merge(&existing, &update);
        assert_eq!(merged.weight_kg, "80,4");
        assert_eq!(
            merged,
            FastingRecord {
                weight_kg: "80,4".into(),
                ..existing
            }
        );
    }

    #[test]
    fn explicit_empty_string_clears_a_field() {
        let update = FastingUpdate {
            note: Some(String::new()),
            ..update_for("06.01.2025")
        };
        validate_update(&update).unwrap();
        let merged = merge(&planned_day(), &update);
        assert_eq!(merged.note, "");
        assert_eq!(merged.fasting_type, "16:8");
    }

    #[test]
    fn weekday_is_carried_over() {
        let mut existing = planned_day();
        existing.weekday = "hand edited".into();
        let update = FastingUpdate {
            status: Some("Dokončený".into()),
            ..update_for("06.01.2025")
        };
        assert_eq!(merge(&existing, &update).weekday, "hand edited");
    }

    #[test]
    fn missing_day_is_not_found() {
        let records = vec![planned_day()];
        let err = apply_update(&records, &update_for("07.01.2025")).unwrap_err();
        assert_eq!(err, MergeError::NotFound("07.01.2025".into()));
    }

    #[test]
    fn apply_update_reports_row_offset() {
        let mut other = planned_day();
        other.date = "05.01.2025".into();
        let records = vec![other, planned_day()];
        let (index, merged) = apply_update(&records, &update_for("06.01.2025")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(merged, planned_day());
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        assert!(validate_weight("39,9").is_err());
        assert!(validate_weight("200.1").is_err());
        assert_eq!(validate_weight("40"), Ok(40.0));
        assert_eq!(validate_weight("200"), Ok(200.0));
        assert!(validate_weight("heavy").is_err());
    }

    #[test]
    fn energy_bounds_are_inclusive() {
        assert!(validate_energy("0").is_err());
        assert!(validate_energy("11").is_err());
        assert!(validate_energy("7,5").is_err());
        assert_eq!(validate_energy("1"), Ok(1));
        assert_eq!(validate_energy("10"), Ok(10));
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let bad_date = update_for("2025-01-06");
        assert!(matches!(validate_update(&bad_date), Err(MergeError::Invalid(_))));

        let bad_status = FastingUpdate {
            status: Some("Hotovo".into()),
            ..update_for("06.01.2025")
        };
        assert!(matches!(validate_update(&bad_status), Err(MergeError::Invalid(_))));

        let bad_time = FastingUpdate {
            start_time: Some("8:00".into()),
            ..update_for("06.01.2025")
        };
        assert!(matches!(validate_update(&bad_time), Err(MergeError::Invalid(_))));

        let heavy = FastingUpdate {
            weight_kg: Some("200,1".into()),
            ..update_for("06.01.2025")
        };
        assert!(matches!(validate_update(&heavy), Err(MergeError::Invalid(_))));
    }
}
