use std::path::Path;

use crate::energyplan::frames::model::{Granularity, NormalizedTable, is_summer_hour};

/// Name of the column carrying the workbook base name.
pub const SOURCE_COLUMN: &str = "source";
/// Name of the hourly summer flag column.
pub const SUMMER_COLUMN: &str = "is_summer_period";

/// Base name of a workbook: no directory and only the last extension removed,
/// so `runs/scenario.v2.xlsx` becomes `scenario.v2`.
pub fn source_tag(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Identifier columns that precede the data columns, in output order.
pub fn identifier_columns(granularity: Granularity) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = granularity.key_name().into_iter().collect();
    columns.push(SOURCE_COLUMN);
    if granularity == Granularity::Hourly {
        columns.push(SUMMER_COLUMN);
    }
    columns
}

/// Computes the summer flag for hourly tables and clears it for the others.
pub fn tag_summer_period(mut table: NormalizedTable) -> NormalizedTable {
    table.is_summer_period = match table.granularity {
        Granularity::Hourly => Some(table.keys.iter().copied().map(is_summer_hour).collect()),
        Granularity::Monthly | Granularity::Yearly => None,
    };
    table
}
