use std::path::Path;

use tracing::instrument;

use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::io::excel_read;
use crate::energyplan::frames::model::{RawTable, SheetRef};
use crate::energyplan::frames::normalize::coerce::{NumberFormat, coerce_cell};
use crate::energyplan::frames::normalize::tag::source_tag;
use crate::energyplan::frames::normalize::window::TITLE_ROWS;

/// Frame positions of the reported cost lines, counted below the title line.
pub const COST_ROWS: [usize; 6] = [53, 54, 60, 62, 64, 66];
const LABEL_COLUMN: usize = 0;
const VALUE_COLUMN: usize = 1;
/// Some lines carry their value in a later column.
const FALLBACK_VALUE_COLUMN: usize = 3;

/// One cost line in million EUR.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
    pub label: String,
    pub value: Option<f64>,
}

/// Cost lines of a single workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSummary {
    pub source: String,
    pub entries: Vec<CostEntry>,
}

/// Reads the cost lines from a workbook.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), %sheet))]
pub fn read_costs(path: &Path, sheet: &SheetRef) -> Result<CostSummary> {
    let raw = excel_read::read_raw_sheet(path, sheet)?;
    extract_costs(&raw, path)
}

/// Extracts the cost lines from an already loaded sheet.
pub fn extract_costs(raw: &RawTable, path: &Path) -> Result<CostSummary> {
    let entries = COST_ROWS
        .iter()
        .map(|position| {
            let row = TITLE_ROWS + position;
            if row >= raw.height() {
                return Err(FrameError::StructuralMismatch {
                    path: path.to_path_buf(),
                    detail: format!(
                        "cost line expected on sheet row {row}, sheet has {} rows",
                        raw.height()
                    ),
                });
            }

            let label = raw.cell(row, LABEL_COLUMN).as_text().trim().to_string();
            let value = coerce_cell(raw.cell(row, VALUE_COLUMN), NumberFormat::DecimalPoint)
                .or_else(|| {
                    coerce_cell(
                        raw.cell(row, FALLBACK_VALUE_COLUMN),
                        NumberFormat::DecimalPoint,
                    )
                });
            Ok(CostEntry { label, value })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CostSummary {
        source: source_tag(path),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energyplan::frames::model::Cell;

    fn cost_grid() -> RawTable {
        let mut rows = vec![Vec::new(); TITLE_ROWS + 67];
        for (index, position) in COST_ROWS.iter().enumerate() {
            rows[TITLE_ROWS + position] = vec![
                Cell::Text(format!("Cost {index}")),
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
            ];
        }
        rows[TITLE_ROWS + 53][1] = Cell::Number(120.0);
        rows[TITLE_ROWS + 66][1] = Cell::Text("-".into());
        rows[TITLE_ROWS + 66][3] = Cell::Number(4500.5);
        RawTable::new(rows)
    }

    #[test]
    fn value_falls_back_to_second_column() {
        let summary = extract_costs(&cost_grid(), Path::new("runs/base.xlsx")).expect("costs");
        assert_eq!(summary.source, "base");
        assert_eq!(summary.entries.len(), COST_ROWS.len());
        assert_eq!(summary.entries[0].value, Some(120.0));
        assert_eq!(summary.entries[1].value, None);
        assert_eq!(summary.entries[5].label, "Cost 5");
        assert_eq!(summary.entries[5].value, Some(4500.5));
    }

    #[test]
    fn short_sheet_is_a_structural_mismatch() {
        let raw = RawTable::new(vec![Vec::new(); 40]);
        let error = extract_costs(&raw, Path::new("short.xlsx")).expect_err("too short");
        assert!(matches!(error, FrameError::StructuralMismatch { .. }));
    }
}
