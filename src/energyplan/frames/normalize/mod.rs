pub mod coerce;
pub mod header;
pub mod tag;
pub mod window;

use std::path::Path;

use tracing::{debug, instrument};

use crate::energyplan::frames::aggregate::{HEAT_UNIT_GROUPS, aggregate_units};
use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::io::excel_read;
use crate::energyplan::frames::model::{
    Cell, Granularity, NormalizedTable, RawTable, Series, SheetRef,
};

use self::coerce::{NumberFormat, coerce_column, coerce_key};
use self::window::RowWindow;

/// Reads one workbook and returns its normalized table.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), %sheet, %granularity))]
pub fn load_table(
    path: &Path,
    sheet: &SheetRef,
    granularity: Granularity,
) -> Result<NormalizedTable> {
    let raw = excel_read::read_raw_sheet(path, sheet)?;
    normalize_sheet(&raw, path, granularity)
}

/// Runs the full reshaping pipeline on an already loaded sheet. `path` names
/// the workbook and provides the `source` tag.
pub fn normalize_sheet(
    raw: &RawTable,
    path: &Path,
    granularity: Granularity,
) -> Result<NormalizedTable> {
    let (labels, sub_labels) = window::header_rows(raw, path)?;
    let names = header::merge_header_rows(labels, sub_labels);
    let rows = window::select_rows(raw, granularity, path)?;

    let keys = match granularity {
        Granularity::Hourly => hour_keys(&rows, path)?,
        Granularity::Monthly => (1..=rows.len() as u32).collect(),
        Granularity::Yearly => Vec::new(),
    };

    // Column 0 holds the time key, or the row caption on the annual line.
    let format = match granularity {
        Granularity::Yearly => NumberFormat::DecimalComma,
        Granularity::Hourly | Granularity::Monthly => NumberFormat::DecimalPoint,
    };
    let data_names = names.get(1..).unwrap_or_default();
    let reserved = tag::identifier_columns(granularity);
    let columns: Vec<Series> = header::first_occurrences(data_names, &reserved)
        .into_iter()
        .map(|offset| {
            let column = offset + 1;
            let cells = rows
                .rows
                .iter()
                .map(|row| row.get(column).unwrap_or(&Cell::Empty));
            Series::new(names[column].clone(), coerce_column(cells, format))
        })
        .collect();

    let table = NormalizedTable {
        source: tag::source_tag(path),
        granularity,
        keys,
        is_summer_period: None,
        columns,
    };
    let table = tag::tag_summer_period(table);
    let table = aggregate_units(table, HEAT_UNIT_GROUPS);

    debug!(
        source = %table.source,
        rows = table.row_count(),
        columns = table.columns.len(),
        "normalized sheet"
    );
    Ok(table)
}

/// Reads the hour of year from the first column. Keys must be whole numbers
/// in strictly ascending order.
fn hour_keys(rows: &RowWindow<'_>, path: &Path) -> Result<Vec<u32>> {
    let mut keys: Vec<u32> = Vec::with_capacity(rows.len());
    for (offset, row) in rows.rows.iter().enumerate() {
        let sheet_row = rows.first_row + offset;
        let cell = row.first().unwrap_or(&Cell::Empty);
        let key = coerce_key(cell).ok_or_else(|| FrameError::StructuralMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "sheet row {sheet_row} has no hour number (found '{}')",
                cell.as_text()
            ),
        })?;

        if let Some(&previous) = keys.last().filter(|previous| key <= **previous) {
            return Err(FrameError::StructuralMismatch {
                path: path.to_path_buf(),
                detail: format!(
                    "hour {key} on sheet row {sheet_row} does not follow hour {previous}"
                ),
            });
        }
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::window::{FRAME_START_ROW, LABEL_ROW, SUB_LABEL_ROW};
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn export_grid(data_rows: Vec<Vec<Cell>>) -> RawTable {
        let mut rows = vec![Vec::new(); FRAME_START_ROW];
        rows[0] = vec![text("EnergyPLAN results")];
        rows[LABEL_ROW] = vec![
            Cell::Empty,
            text("Wind"),
            text("Solar"),
            text("Solar2"),
            text("Wind"),
            text("source"),
        ];
        rows[SUB_LABEL_ROW] = vec![
            Cell::Empty,
            text("Electr."),
            text("Heat"),
            text("Heat"),
            text("Electr."),
            Cell::Empty,
        ];
        rows.extend(data_rows);
        RawTable::new(rows)
    }

    #[test]
    fn yearly_row_drops_caption_and_reads_decimal_commas() {
        let mut data = vec![Vec::new(); 3];
        data[2] = vec![
            text("Annual (TWh/year)"),
            text("12,5"),
            Cell::Number(1.0),
            text("0,5"),
            Cell::Number(99.0),
            text("x"),
        ];
        let path = Path::new("runs/ref.xlsx");
        let table =
            normalize_sheet(&export_grid(data), path, Granularity::Yearly).expect("yearly table");

        assert_eq!(table.source, "ref");
        assert!(table.keys.is_empty());
        assert_eq!(table.is_summer_period, None);
        assert_eq!(table.header(), vec!["source", "Wind_Electr.", "Solar_tot_Heat"]);
        assert_eq!(
            table.column("Wind_Electr.").expect("wind").values,
            vec![Some(12.5)]
        );
        assert_eq!(
            table.column("Solar_tot_Heat").expect("solar").values,
            vec![Some(1.5)]
        );
    }

    #[test]
    fn hourly_keys_must_ascend() {
        let mut data: Vec<Vec<Cell>> = vec![Vec::new(); 23];
        data.push(vec![Cell::Number(1.0), Cell::Number(3.0)]);
        data.push(vec![Cell::Number(1.0), Cell::Number(4.0)]);
        let error = normalize_sheet(&export_grid(data), Path::new("h.xlsx"), Granularity::Hourly)
            .expect_err("repeated hour should be rejected");
        assert!(matches!(error, FrameError::StructuralMismatch { .. }));
    }

    #[test]
    fn hourly_keys_must_be_numbers() {
        let mut data: Vec<Vec<Cell>> = vec![Vec::new(); 23];
        data.push(vec![text("Total"), Cell::Number(3.0)]);
        let result = normalize_sheet(&export_grid(data), Path::new("h.xlsx"), Granularity::Hourly);
        assert!(result.is_err());
    }
}
