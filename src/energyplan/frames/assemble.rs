use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::model::{Granularity, NormalizedTable, SheetRef};
use crate::energyplan::frames::normalize;

/// Columns compared when the caller does not ask for specific ones. The two
/// district heating stores are only available as their aggregate.
pub const DEFAULT_COMPARISON_COLUMNS: &[&str] = &[
    "Storage_Heat",
    "V2G_Storage",
    "Storage_Content",
    "Store_Storage",
    "H2_Storage",
];

/// Normalizes every workbook in order. `files` are resolved against
/// `input_dir`; absolute paths are used as given. The first failing workbook
/// aborts the whole collection.
#[instrument(level = "info", skip_all, fields(input_dir = %input_dir.display(), %granularity))]
pub fn load_cases(
    input_dir: &Path,
    files: &[PathBuf],
    sheet: &SheetRef,
    granularity: Granularity,
) -> Result<Vec<NormalizedTable>> {
    if files.is_empty() {
        return Err(FrameError::NoCases);
    }

    let mut tables = Vec::with_capacity(files.len());
    for file in files {
        let path = input_dir.join(file);
        let table = normalize::load_table(&path, sheet, granularity)?;
        info!(
            source = %table.source,
            rows = table.row_count(),
            columns = table.columns.len(),
            "loaded case"
        );
        tables.push(table);
    }
    Ok(tables)
}

/// Identifier used to label a case: its `source` tag, or `case_{index}` when
/// the tag is empty.
pub fn case_id(index: usize, table: &NormalizedTable) -> String {
    if table.source.is_empty() {
        format!("case_{index}")
    } else {
        table.source.clone()
    }
}

pub fn case_ids(tables: &[NormalizedTable]) -> Vec<String> {
    tables
        .iter()
        .enumerate()
        .map(|(index, table)| case_id(index, table))
        .collect()
}

/// A requested column that is absent from at least one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub column: String,
    /// Cases lacking the column.
    pub missing_in: Vec<String>,
    /// Cases that do carry the column.
    pub present_in: Vec<String>,
}

/// Outcome of matching requested columns against a case collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPlan {
    pub case_ids: Vec<String>,
    /// Requested columns present in every case, in request order.
    pub columns: Vec<String>,
    /// Requested columns excluded from the comparison, one entry per column.
    pub missing: Vec<MissingColumn>,
}

/// Keeps the requested columns that every case carries and reports the rest.
///
/// Each excluded column is logged once as a warning naming the cases that lack
/// it. Repeated requests for the same column are ignored.
pub fn plan_comparison(tables: &[NormalizedTable], requested: &[String]) -> ComparisonPlan {
    let ids = case_ids(tables);
    let mut columns: Vec<String> = Vec::new();
    let mut missing: Vec<MissingColumn> = Vec::new();

    for column in requested {
        let seen = columns.contains(column) || missing.iter().any(|entry| &entry.column == column);
        if seen {
            continue;
        }

        let (present_in, missing_in): (Vec<_>, Vec<_>) = tables
            .iter()
            .zip(&ids)
            .partition(|(table, _)| table.has_column(column));
        if missing_in.is_empty() {
            columns.push(column.clone());
            continue;
        }

        let missing_in: Vec<String> = missing_in.into_iter().map(|(_, id)| id.clone()).collect();
        let present_in: Vec<String> = present_in.into_iter().map(|(_, id)| id.clone()).collect();
        warn!(
            column = %column,
            missing_in = ?missing_in,
            "column missing in at least one case and will be skipped"
        );
        missing.push(MissingColumn {
            column: column.clone(),
            missing_in,
            present_in,
        });
    }

    ComparisonPlan {
        case_ids: ids,
        columns,
        missing,
    }
}

/// Columns requested by the caller. Without a request, yearly comparisons
/// cover every data column shared by all cases; the finer granularities fall
/// back to the storage set.
pub fn requested_columns(
    columns: &[String],
    granularity: Granularity,
    tables: &[NormalizedTable],
) -> Vec<String> {
    if !columns.is_empty() {
        return columns.to_vec();
    }
    match granularity {
        Granularity::Yearly => shared_columns(tables),
        Granularity::Hourly | Granularity::Monthly => DEFAULT_COMPARISON_COLUMNS
            .iter()
            .map(|column| column.to_string())
            .collect(),
    }
}

/// Data columns of the first case that every other case carries too.
pub fn shared_columns(tables: &[NormalizedTable]) -> Vec<String> {
    let Some(first) = tables.first() else {
        return Vec::new();
    };
    first
        .data_column_names()
        .filter(|name| tables.iter().all(|table| table.has_column(name)))
        .map(str::to_string)
        .collect()
}

/// Data columns of the first case that are present in every case and whose
/// values are all present and strictly above `min_value`.
pub fn significant_columns(tables: &[NormalizedTable], min_value: f64) -> Vec<String> {
    let Some(first) = tables.first() else {
        return Vec::new();
    };

    first
        .data_column_names()
        .filter(|name| {
            tables.iter().all(|table| {
                table.column(name).is_some_and(|series| {
                    series
                        .values
                        .iter()
                        .all(|value| value.is_some_and(|value| value > min_value))
                })
            })
        })
        .map(str::to_string)
        .collect()
}
