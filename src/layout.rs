//! Column layout of the two sheet ranges.
//!
//! Rows coming from the store are positional; everything past this module
//! works with named fields only.

use crate::models::{FastingRecord, MealRecord};

pub const FASTING_COLUMNS: usize = 10;
pub const MEAL_COLUMNS: usize = 9;

/// Sheet row of the first data row (row 1 holds the header).
pub const FIRST_DATA_ROW: usize = 2;

mod fasting_col {
    pub const DATE: usize = 0;
    pub const WEEKDAY: usize = 1;
    pub const FASTING_TYPE: usize = 2;
    pub const START_TIME: usize = 3;
    pub const END_TIME: usize = 4;
    pub const DURATION: usize = 5;
    pub const STATUS: usize = 6;
    pub const WEIGHT: usize = 7;
    pub const ENERGY: usize = 8;
    pub const NOTE: usize = 9;
}

mod meal_col {
    pub const DATE: usize = 0;
    pub const TIME: usize = 1;
    pub const MEAL_TYPE: usize = 2;
    pub const NAME: usize = 3;
    pub const CALORIES: usize = 4;
    pub const PROTEIN: usize = 5;
    pub const CARBS: usize = 6;
    pub const FAT: usize = 7;
    pub const NOTE: usize = 8;
}

// The store omits trailing empty cells, so short rows read as blanks.
fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

impl FastingRecord {
    pub fn from_row(row: &[String]) -> Self {
        use fasting_col::*;
        Self {
            date: cell(row, DATE),
            weekday: cell(row, WEEKDAY),
            fasting_type: cell(row, FASTING_TYPE),
            start_time: cell(row, START_TIME),
            end_time: cell(row, END_TIME),
            duration_hours: cell(row, DURATION),
            status: cell(row, STATUS),
            weight_kg: cell(row, WEIGHT),
            energy_level: cell(row, ENERGY),
            note: cell(row, NOTE),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        use fasting_col::*;
        let mut row = vec![String::new(); FASTING_COLUMNS];
        row[DATE] = self.date.clone();
        row[WEEKDAY] = self.weekday.clone();
        row[FASTING_TYPE] = self.fasting_type.clone();
        row[START_TIME] = self.start_time.clone();
        row[END_TIME] = self.end_time.clone();
        row[DURATION] = self.duration_hours.clone();
        row[STATUS] = self.status.clone();
        row[WEIGHT] = self.weight_kg.clone();
        row[ENERGY] = self.energy_level.clone();
        row[NOTE] = self.note.clone();
        row
    }
}

impl MealRecord {
    pub fn from_row(row: &[String]) -> Self {
        use meal_col::*;
        Self {
            date: cell(row, DATE),
            meal_time: cell(row, TIME),
            meal_type: cell(row, MEAL_TYPE),
            name: cell(row, NAME),
            calories: cell(row, CALORIES),
            protein: cell(row, PROTEIN),
            carbs: cell(row, CARBS),
            fat: cell(row, FAT),
            note: cell(row, NOTE),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        use meal_col::*;
        let mut row = vec![String::new(); MEAL_COLUMNS];
        row[DATE] = self.date.clone();
        row[TIME] = self.meal_time.clone();
        row[MEAL_TYPE] = self.meal_type.clone();
        row[NAME] = self.name.clone();
        row[CALORIES] = self.calories.clone();
        row[PROTEIN] = self.protein.clone();
        row[CARBS] = self.carbs.clone();
        row[FAT] = self.fat.clone();
        row[NOTE] = self.note.clone();
        row
    }
}

pub fn fasting_records(rows: &[Vec<String>]) -> Vec<FastingRecord> {
    rows.iter().map(|row| FastingRecord::from_row(row)).collect()
}

pub fn meal_records(rows: &[Vec<String>]) -> Vec<MealRecord> {
    rows.iter().map(|row| MealRecord::from_row(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn fasting_row_maps_every_column() {
        let cells = row(&[
            "01.01.2025", "Streda", "16:8", "20:00", "12:00", "16", "Dokončený", "80,5", "7", "ok",
        ]);
        let record = FastingRecord::from_row(&cells);
        assert_eq!(record.weekday, "Streda");
        assert_eq!(record.duration_hours, "16");
        assert_eq!(record.weight_kg, "80,5");
        assert_eq!(record.note, "ok");
        assert_eq!(record.to_row(), cells);
    }

    #[test]
    fn short_rows_are_padded_with_blanks() {
        let record = FastingRecord::from_row(&row(&["02.01.2025", "Štvrtok", "18:6"]));
        assert_eq!(record.fasting_type, "18:6");
        assert_eq!(record.status, "");
        assert_eq!(record.to_row().len(), FASTING_COLUMNS);

        let meal = MealRecord::from_row(&row(&["02.01.2025", "12:30", "Obed", "Polievka"]));
        assert_eq!(meal.name, "Polievka");
        assert_eq!(meal.note, "");
        assert_eq!(meal.to_row().len(), MEAL_COLUMNS);
    }
}
