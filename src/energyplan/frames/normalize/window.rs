//! Fixed row geometry of the simulation tool's spreadsheet export.
//!
//! The export has no named anchors, so every offset below is a contract with
//! the layout written by EnergyPLAN 16.3 result workbooks. A workbook that is
//! too short for the requested window is rejected instead of truncated.

use std::ops::Range;
use std::path::Path;

use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::model::{Cell, Granularity, RawTable};

/// Title line at the very top of the export.
pub const TITLE_ROWS: usize = 1;
/// Preamble rows between the title line and the header block.
pub const HEADER_SKIP_ROWS: usize = 79;
/// Sheet row holding the column labels.
pub const LABEL_ROW: usize = TITLE_ROWS + HEADER_SKIP_ROWS;
/// Sheet row holding the column sub-labels.
pub const SUB_LABEL_ROW: usize = LABEL_ROW + 1;
/// Sheet row of frame position 0, the first row below the header block.
pub const FRAME_START_ROW: usize = SUB_LABEL_ROW + 1;

/// Frame position of the annual totals line.
pub const ANNUAL_ROW: usize = 2;
/// Frame position of January in the monthly block.
pub const FIRST_MONTH_ROW: usize = 5;
/// Frame position of December in the monthly block.
pub const LAST_MONTH_ROW: usize = 16;
/// Frame position of the first hourly sample.
pub const FIRST_HOUR_ROW: usize = 23;

/// Contiguous block of data rows selected from a raw sheet.
#[derive(Debug, Clone, Copy)]
pub struct RowWindow<'a> {
    /// Sheet row of the first selected row.
    pub first_row: usize,
    pub rows: &'a [Vec<Cell>],
}

impl RowWindow<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Frame positions covered by a granularity. Hourly windows are open ended.
pub fn frame_positions(granularity: Granularity) -> Range<usize> {
    match granularity {
        Granularity::Hourly => FIRST_HOUR_ROW..usize::MAX,
        Granularity::Monthly => FIRST_MONTH_ROW..LAST_MONTH_ROW + 1,
        Granularity::Yearly => ANNUAL_ROW..ANNUAL_ROW + 1,
    }
}

/// Returns the label and sub-label rows of the header block.
pub fn header_rows<'a>(raw: &'a RawTable, path: &Path) -> Result<(&'a [Cell], &'a [Cell])> {
    match (raw.row(LABEL_ROW), raw.row(SUB_LABEL_ROW)) {
        (Some(labels), Some(sub_labels)) => Ok((labels, sub_labels)),
        _ => Err(FrameError::StructuralMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "header block expected on sheet rows {LABEL_ROW} and {SUB_LABEL_ROW}, \
                 sheet has {} rows",
                raw.height()
            ),
        }),
    }
}

/// Selects the data rows for the requested granularity.
pub fn select_rows<'a>(
    raw: &'a RawTable,
    granularity: Granularity,
    path: &Path,
) -> Result<RowWindow<'a>> {
    let positions = frame_positions(granularity);
    let available = raw.height().saturating_sub(FRAME_START_ROW);
    let end = positions.end.min(available);

    let complete = match granularity {
        Granularity::Hourly => available > positions.start,
        Granularity::Monthly | Granularity::Yearly => available >= positions.end,
    };
    if !complete {
        return Err(FrameError::StructuralMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "{granularity} rows expected at frame positions {}..{}, \
                 only {available} data rows below the header",
                positions.start,
                describe_end(granularity, positions.end)
            ),
        });
    }

    let first_row = FRAME_START_ROW + positions.start;
    let rows = &raw.rows()[first_row..FRAME_START_ROW + end];
    Ok(RowWindow { first_row, rows })
}

fn describe_end(granularity: Granularity, end: usize) -> String {
    match granularity {
        Granularity::Hourly => "end of sheet".to_string(),
        _ => end.to_string(),
    }
}
