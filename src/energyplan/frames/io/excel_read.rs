use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::debug;

use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::model::{Cell, RawTable, SheetRef};

/// Loads a worksheet into a [`RawTable`] without interpreting any cell.
///
/// The grid is anchored at the sheet origin: calamine trims leading blank
/// rows and columns from a range, so they are padded back in to keep every
/// position identical to the one shown in the spreadsheet.
pub fn read_raw_sheet(path: &Path, sheet: &SheetRef) -> Result<RawTable> {
    if !path.exists() {
        return Err(FrameError::MissingInput(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range_result = match sheet {
        SheetRef::Index(index) => workbook.worksheet_range_at(*index),
        SheetRef::Name(name) => workbook.worksheet_range(name),
    };
    let range = range_result
        .ok_or_else(|| FrameError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        })?
        .map_err(FrameError::from)?;

    let table = range_to_table(&range);
    debug!(
        path = %path.display(),
        %sheet,
        height = table.height(),
        width = table.width(),
        "read raw sheet"
    );
    Ok(table)
}

fn range_to_table(range: &Range<DataType>) -> RawTable {
    let (row_offset, column_offset) = match range.start() {
        Some((row, column)) => (row as usize, column as usize),
        None => return RawTable::default(),
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for source_row in range.rows() {
        let mut cells = vec![Cell::Empty; column_offset];
        cells.extend(source_row.iter().map(to_cell));
        rows.push(cells);
    }

    RawTable::new(rows)
}

fn to_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(value) => Cell::Number(*value),
        other => Cell::Text(other.to_string()),
    }
}
