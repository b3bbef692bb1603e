use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Table, TableColumn, Workbook};

use crate::energyplan::frames::error::Result;
use crate::energyplan::frames::model::{CellValue, WorkbookData};

const MAX_SHEET_NAME_LEN: usize = 31;

/// Writes the provided workbook data to the given path, one Excel table per
/// sheet.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let mut sheet_names = SheetNameRegistry::default();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(sheet_names.assign(&table.sheet_name))?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let sheet_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col = col_idx as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(value) => {
                        worksheet.write_string(sheet_row, col, value)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number(sheet_row, col, *value)?;
                    }
                    CellValue::Bool(value) => {
                        worksheet.write_boolean(sheet_row, col, *value)?;
                    }
                }
            }
        }

        if table.columns.is_empty() || table.rows.is_empty() {
            continue;
        }

        let headers: Vec<TableColumn> = table
            .columns
            .iter()
            .map(|header| TableColumn::new().set_header(header))
            .collect();
        let mut excel_table = Table::new();
        excel_table.set_autofilter(true).set_columns(&headers);
        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len() as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Hands out unique, Excel-safe sheet names.
#[derive(Debug, Default)]
struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        // Excel compares sheet names case-insensitively.
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let prefix = truncate_chars(&base, MAX_SHEET_NAME_LEN - suffix.len());
            let candidate = format!("{prefix}{suffix}");
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "Sheet".to_string();
    }

    truncate_chars(sanitized, MAX_SHEET_NAME_LEN)
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
