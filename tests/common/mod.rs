#![allow(dead_code)]

use std::path::{Path, PathBuf};

use energyplan_frames::costs::COST_ROWS;
use energyplan_frames::normalize::window::{
    ANNUAL_ROW, FIRST_HOUR_ROW, FIRST_MONTH_ROW, FRAME_START_ROW, LABEL_ROW, SUB_LABEL_ROW,
    TITLE_ROWS,
};
use rust_xlsxwriter::Workbook;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Shape of a synthetic simulation export.
pub struct ExportFixture {
    pub sheet_name: String,
    /// Label and sub-label per data column. An empty sub-label leaves the cell
    /// blank.
    pub columns: Vec<(String, String)>,
    pub hours: u32,
    /// Cost line values in sheet order.
    pub cost_values: [f64; 6],
}

impl ExportFixture {
    pub fn new(columns: &[(&str, &str)], hours: u32) -> Self {
        Self {
            sheet_name: "Results".to_string(),
            columns: columns
                .iter()
                .map(|(label, sub_label)| (label.to_string(), sub_label.to_string()))
                .collect(),
            hours,
            cost_values: [100.0, 200.0, 300.0, 400.0, 500.0, 600.0],
        }
    }

    /// Value written for data column `column` (0-based) at `key`.
    pub fn value(column: usize, key: u32) -> f64 {
        f64::from(key) * (column as f64 + 1.0)
    }

    /// Annual total written for data column `column`, as a decimal comma text.
    pub fn annual_text(column: usize) -> String {
        format!("{},25", column + 1)
    }

    pub fn annual_value(column: usize) -> f64 {
        column as f64 + 1.25
    }

    pub fn write(&self, path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name).expect("sheet name");
        sheet
            .write_string(0, 0, "EnergyPLAN output")
            .expect("title written");

        for (index, position) in COST_ROWS.iter().enumerate() {
            let row = (TITLE_ROWS + position) as u32;
            sheet
                .write_string(row, 0, format!("Cost line {index}"))
                .expect("cost label");
            // The last line keeps its value in the fallback column.
            let column = if index == COST_ROWS.len() - 1 { 3 } else { 1 };
            sheet
                .write_number(row, column, self.cost_values[index])
                .expect("cost value");
        }

        for (index, (label, sub_label)) in self.columns.iter().enumerate() {
            let column = (index + 1) as u16;
            sheet
                .write_string(LABEL_ROW as u32, column, label)
                .expect("label written");
            if !sub_label.is_empty() {
                sheet
                    .write_string(SUB_LABEL_ROW as u32, column, sub_label)
                    .expect("sub-label written");
            }
        }

        let annual_row = (FRAME_START_ROW + ANNUAL_ROW) as u32;
        sheet
            .write_string(annual_row, 0, "Annual (TWh/year)")
            .expect("annual caption");
        for index in 0..self.columns.len() {
            sheet
                .write_string(annual_row, (index + 1) as u16, Self::annual_text(index))
                .expect("annual value");
        }

        for (offset, month) in MONTHS.iter().enumerate() {
            let row = (FRAME_START_ROW + FIRST_MONTH_ROW + offset) as u32;
            sheet.write_string(row, 0, *month).expect("month caption");
            for index in 0..self.columns.len() {
                let value = Self::value(index, offset as u32 + 1);
                sheet
                    .write_number(row, (index + 1) as u16, value)
                    .expect("monthly value");
            }
        }

        let first_hour_row = (FRAME_START_ROW + FIRST_HOUR_ROW) as u32;
        sheet
            .write_string(first_hour_row - 1, 0, "Hour")
            .expect("hourly caption");
        for hour in 1..=self.hours {
            let row = first_hour_row + hour - 1;
            sheet
                .write_number(row, 0, f64::from(hour))
                .expect("hour written");
            for index in 0..self.columns.len() {
                sheet
                    .write_number(row, (index + 1) as u16, Self::value(index, hour))
                    .expect("hourly value");
            }
        }

        workbook.save(path).expect("fixture saved");
    }
}

/// Writes a fixture named `file_name` into `dir` and returns its path.
pub fn write_fixture(dir: &Path, file_name: &str, fixture: &ExportFixture) -> PathBuf {
    let path = dir.join(file_name);
    fixture.write(&path);
    path
}

/// Columns of a typical export, including heat units to aggregate.
pub fn standard_columns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Electr.", "Demand"),
        ("Wind", "Electr."),
        ("Solar", "Heat"),
        ("Solar2", "Heat"),
        ("HP 2", "Heat"),
        ("HP 3", "Heat"),
        ("H2", "Storage"),
    ]
}
