//! Conversions between the sheet's Slovak display format and typed values.
//!
//! Dates are `DD.MM.YYYY`, times `HH:MM`, decimals use a comma separator.
//! Cells are edited by hand as well, so rendering must stay zero-padded and
//! use the same separator the sheet does.

use chrono::{NaiveDate, NaiveTime};

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("date '{0}' must use the DD.MM.YYYY format")]
    Date(String),
    #[error("time '{0}' must use the HH:MM format")]
    Time(String),
}

pub fn parse_date(input: &str) -> Result<NaiveDate, FormatError> {
    if !matches_pattern(input, "dd.dd.dddd") {
        return Err(FormatError::Date(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| FormatError::Date(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_time(input: &str) -> Result<NaiveTime, FormatError> {
    if !matches_pattern(input, "dd:dd") {
        return Err(FormatError::Time(input.to_string()));
    }
    NaiveTime::parse_from_str(input, TIME_FORMAT).map_err(|_| FormatError::Time(input.to_string()))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parses a decimal written with either `,` or `.` as separator.
///
/// Blank, malformed and non-finite input yields `None`, so callers can tell an
/// unusable cell apart from a real zero.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Shortest round-trip rendering with a comma separator: `12.5` -> `"12,5"`.
pub fn format_decimal(value: f64) -> String {
    value.to_string().replacen('.', ",", 1)
}

/// Fixed number of decimals with a comma separator: `33.0` -> `"33,0"`.
pub fn format_decimal_fixed(value: f64, places: usize) -> String {
    format!("{value:.places$}").replacen('.', ",", 1)
}

/// Like [`format_decimal_fixed`] with one decimal, prefixed with `+` for
/// positive values.
pub fn format_signed(value: f64) -> String {
    let rendered = format_decimal_fixed(value, 1);
    if value > 0.0 {
        format!("+{rendered}")
    } else {
        rendered
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// `d` stands for an ASCII digit, any other byte must match literally.
fn matches_pattern(input: &str, pattern: &str) -> bool {
    input.len() == pattern.len()
        && input
            .bytes()
            .zip(pattern.bytes())
            .all(|(byte, expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                other => byte == other,
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_round_trips_with_zero_padding() {
        for input in ["01.01.2025", "29.02.2024", "31.12.1999", "05.10.2026"] {
            let date = parse_date(input).unwrap();
            assert_eq!(format_date(date), input);
        }
    }

    #[test]
    fn date_rejects_loose_patterns() {
        for input in ["1.1.2025", "2025-01-01", "01.01.25", " 01.01.2025", "01/01/2025", ""] {
            assert_eq!(parse_date(input), Err(FormatError::Date(input.to_string())));
        }
    }

    #[test]
    fn date_rejects_impossible_calendar_days() {
        assert!(parse_date("30.02.2025").is_err());
        assert!(parse_date("29.02.2025").is_err());
        assert!(parse_date("00.01.2025").is_err());
        assert!(parse_date("01.13.2025").is_err());
    }

    #[test]
    fn time_requires_two_digit_fields() {
        assert_eq!(format_time(parse_time("08:05").unwrap()), "08:05");
        assert!(parse_time("8:05").is_err());
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
    }

    #[test]
    fn decimal_accepts_both_separators() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal(" 16 "), Some(16.0));
        assert_eq!(parse_decimal("0"), Some(0.0));
    }

    #[test]
    fn decimal_reports_unusable_cells_as_none() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("16h"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn decimal_display_form_round_trips() {
        for input in ["12,5", "78,8", "16", "0,5"] {
            let value = parse_decimal(input).unwrap();
            assert_eq!(format_decimal(value), input);
        }
        assert_eq!(format_decimal(parse_decimal("12.5").unwrap()), "12,5");
    }

    #[test]
    fn fixed_and_signed_rendering() {
        assert_eq!(format_decimal_fixed(33.0, 1), "33,0");
        assert_eq!(format_decimal_fixed(17.04, 1), "17,0");
        assert_eq!(format_signed(-1.2), "-1,2");
        assert_eq!(format_signed(0.6), "+0,6");
        assert_eq!(format_signed(0.0), "0,0");
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round1(66.666_666), 66.7);
        assert_eq!(round1(17.0), 17.0);
        assert_eq!(round1(-1.199_999), -1.2);
    }
}
