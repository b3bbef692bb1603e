use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::energyplan::frames::assemble::{
    self, ComparisonPlan, case_ids, plan_comparison, requested_columns, significant_columns,
};
use crate::energyplan::frames::config::Labels;
use crate::energyplan::frames::costs::{self, CostSummary};
use crate::energyplan::frames::error::{FrameError, Result};
use crate::energyplan::frames::io::excel_write;
use crate::energyplan::frames::model::{
    CellValue, Granularity, NormalizedTable, SheetRef, SheetTable, WorkbookData,
};

/// Sheet holding the yearly composition view.
pub const COMPOSITION_SHEET: &str = "Composition";
/// Sheet holding the cost summary.
pub const COSTS_SHEET: &str = "Costs";

/// Everything needed to build a cross-case comparison.
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub input_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub sheet: SheetRef,
    pub granularity: Granularity,
    /// Columns to compare. Empty selects the default set for the granularity.
    pub columns: Vec<String>,
    pub labels: Labels,
    /// Yearly only: add a composition sheet of the columns above this value.
    pub min_value: Option<f64>,
    /// Also compare excluded columns across the cases that carry them.
    pub include_partial: bool,
}

/// Writes one sheet per normalized case.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %output.display(), %granularity, cases = files.len())
)]
pub fn export_cases(
    input_dir: &Path,
    files: &[PathBuf],
    sheet: &SheetRef,
    granularity: Granularity,
    output: &Path,
) -> Result<()> {
    let tables = assemble::load_cases(input_dir, files, sheet, granularity)?;
    let ids = case_ids(&tables);
    let workbook = WorkbookData {
        tables: tables
            .iter()
            .zip(ids)
            .map(|(table, id)| case_sheet(table, id))
            .collect(),
    };
    debug!(sheet_count = workbook.tables.len(), "workbook constructed");
    excel_write::write_workbook(output, &workbook)
}

/// Writes one sheet per comparable column and returns the comparison plan,
/// including the columns that had to be skipped.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %output.display(), granularity = %request.granularity)
)]
pub fn export_comparison(request: &ComparisonRequest, output: &Path) -> Result<ComparisonPlan> {
    let tables = assemble::load_cases(
        &request.input_dir,
        &request.files,
        &request.sheet,
        request.granularity,
    )?;
    let requested = requested_columns(&request.columns, request.granularity, &tables);
    let plan = plan_comparison(&tables, &requested);

    let mut sheets: Vec<SheetTable> = plan
        .columns
        .iter()
        .map(|column| comparison_sheet(&tables, column, &request.labels))
        .collect();

    if request.include_partial {
        sheets.extend(
            plan.missing
                .iter()
                .filter(|entry| !entry.present_in.is_empty())
                .map(|entry| comparison_sheet(&tables, &entry.column, &request.labels)),
        );
    }

    if let (Granularity::Yearly, Some(min_value)) = (request.granularity, request.min_value) {
        let columns = significant_columns(&tables, min_value);
        info!(
            columns = columns.len(),
            min_value, "selected significant columns for composition"
        );
        if !columns.is_empty() {
            sheets.push(composition_sheet(&tables, &columns, &request.labels));
        }
    }

    if sheets.is_empty() {
        return Err(FrameError::NoComparableColumns(requested));
    }

    info!(
        compared = plan.columns.len(),
        skipped = plan.missing.len(),
        "comparison prepared"
    );
    excel_write::write_workbook(output, &WorkbookData { tables: sheets })?;
    Ok(plan)
}

/// Writes the cost lines of every case as one row per case.
#[instrument(level = "info", skip_all, fields(output = %output.display(), cases = files.len()))]
pub fn export_costs(
    input_dir: &Path,
    files: &[PathBuf],
    sheet: &SheetRef,
    labels: &Labels,
    output: &Path,
) -> Result<()> {
    if files.is_empty() {
        return Err(FrameError::NoCases);
    }
    let summaries = files
        .iter()
        .map(|file| costs::read_costs(&input_dir.join(file), sheet))
        .collect::<Result<Vec<_>>>()?;
    info!(cases = summaries.len(), "read cost summaries");

    let workbook = WorkbookData {
        tables: vec![cost_sheet(&summaries, labels)],
    };
    excel_write::write_workbook(output, &workbook)
}

/// Lays out a normalized table with its identifier columns first.
pub fn case_sheet(table: &NormalizedTable, sheet_name: String) -> SheetTable {
    let rows = (0..table.row_count())
        .map(|row| {
            let mut cells = Vec::with_capacity(table.columns.len() + 3);
            if table.granularity != Granularity::Yearly {
                let key = table.keys.get(row).copied().map(f64::from);
                cells.push(CellValue::from(key));
            }
            cells.push(CellValue::Text(table.source.clone()));
            if let Some(flags) = &table.is_summer_period {
                cells.push(
                    flags
                        .get(row)
                        .map_or(CellValue::Empty, |flag| CellValue::Bool(*flag)),
                );
            }
            cells.extend(
                table
                    .columns
                    .iter()
                    .map(|series| CellValue::from(series.values.get(row).copied().flatten())),
            );
            cells
        })
        .collect();

    SheetTable {
        sheet_name,
        columns: unique_headers(table.header()),
        rows,
    }
}

/// Lines up one column across the cases that carry it.
///
/// Hourly and monthly comparisons have the time key first and one column per
/// case, aligned on the key. Yearly comparisons have one row per case.
pub fn comparison_sheet(tables: &[NormalizedTable], column: &str, labels: &Labels) -> SheetTable {
    let cases: Vec<(String, &NormalizedTable)> = tables
        .iter()
        .enumerate()
        .filter(|(_, table)| table.has_column(column))
        .map(|(index, table)| {
            let id = assemble::case_id(index, table);
            (labels.case(&id).to_string(), table)
        })
        .collect();
    let title = labels.technology(column).to_string();
    let granularity = tables
        .first()
        .map_or(Granularity::Yearly, |table| table.granularity);

    let Some(key_name) = granularity.key_name() else {
        let rows = cases
            .iter()
            .map(|(label, table)| {
                let value = table
                    .column(column)
                    .and_then(|series| series.values.first().copied().flatten());
                vec![CellValue::Text(label.clone()), CellValue::from(value)]
            })
            .collect();
        return SheetTable {
            sheet_name: title.clone(),
            columns: unique_headers(vec![
                "case".to_string(),
                format!("{title} ({})", granularity.unit()),
            ]),
            rows,
        };
    };

    let mut aligned: BTreeMap<u32, Vec<CellValue>> = BTreeMap::new();
    for (position, (_, table)) in cases.iter().enumerate() {
        let Some(series) = table.column(column) else {
            continue;
        };
        for (key, value) in table.keys.iter().zip(&series.values) {
            let row = aligned
                .entry(*key)
                .or_insert_with(|| vec![CellValue::Empty; cases.len()]);
            row[position] = CellValue::from(*value);
        }
    }

    let mut headers = vec![key_name.to_string()];
    headers.extend(cases.iter().map(|(label, _)| label.clone()));
    let rows = aligned
        .into_iter()
        .map(|(key, values)| {
            let mut row = Vec::with_capacity(values.len() + 1);
            row.push(CellValue::Number(f64::from(key)));
            row.extend(values);
            row
        })
        .collect();

    SheetTable {
        sheet_name: title,
        columns: unique_headers(headers),
        rows,
    }
}

/// Yearly composition: one row per case, one column per technology.
pub fn composition_sheet(
    tables: &[NormalizedTable],
    columns: &[String],
    labels: &Labels,
) -> SheetTable {
    let mut headers = vec!["case".to_string()];
    headers.extend(
        columns
            .iter()
            .map(|column| labels.technology(column).to_string()),
    );

    let rows = tables
        .iter()
        .enumerate()
        .map(|(index, table)| {
            let id = assemble::case_id(index, table);
            let mut row = vec![CellValue::Text(labels.case(&id).to_string())];
            row.extend(columns.iter().map(|column| {
                let value = table
                    .column(column)
                    .and_then(|series| series.values.first().copied().flatten());
                CellValue::from(value)
            }));
            row
        })
        .collect();

    SheetTable {
        sheet_name: COMPOSITION_SHEET.to_string(),
        columns: unique_headers(headers),
        rows,
    }
}

/// One row per case, one column per cost line (million EUR).
pub fn cost_sheet(summaries: &[CostSummary], labels: &Labels) -> SheetTable {
    let mut headers = vec!["Case (M EUR)".to_string()];
    if let Some(first) = summaries.first() {
        headers.extend(first.entries.iter().map(|entry| entry.label.clone()));
    }

    let rows = summaries
        .iter()
        .map(|summary| {
            let mut row = vec![CellValue::Text(labels.case(&summary.source).to_string())];
            row.extend(summary.entries.iter().map(|entry| CellValue::from(entry.value)));
            row
        })
        .collect();

    SheetTable {
        sheet_name: COSTS_SHEET.to_string(),
        columns: unique_headers(headers),
        rows,
    }
}

/// Excel table headers must be non-empty and unique ignoring case.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Column{}", index + 1)
            } else {
                header
            };
            let mut candidate = base.clone();
            let mut counter = 1;
            while !seen.insert(candidate.to_lowercase()) {
                counter += 1;
                candidate = format!("{base} ({counter})");
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energyplan::frames::model::Series;

    fn monthly(source: &str, column: &str, values: &[f64]) -> NormalizedTable {
        NormalizedTable {
            source: source.to_string(),
            granularity: Granularity::Monthly,
            keys: (1..=values.len() as u32).collect(),
            is_summer_period: None,
            columns: vec![Series::new(
                column,
                values.iter().copied().map(Some).collect(),
            )],
        }
    }

    #[test]
    fn comparison_aligns_cases_on_key() {
        let tables = vec![
            monthly("base", "H2_Storage", &[1.0, 2.0]),
            monthly("shock", "PV_Electr.", &[9.0, 9.0]),
            monthly("high", "H2_Storage", &[3.0, 4.0]),
        ];
        let mut labels = Labels::default();
        labels.cases.insert("high".into(), "High demand".into());
        labels
            .technologies
            .insert("H2_Storage".into(), "Hydrogen storage".into());

        let sheet = comparison_sheet(&tables, "H2_Storage", &labels);
        assert_eq!(sheet.sheet_name, "Hydrogen storage");
        assert_eq!(sheet.columns, vec!["month", "base", "High demand"]);
        assert_eq!(
            sheet.rows[1],
            vec![
                CellValue::Number(2.0),
                CellValue::Number(2.0),
                CellValue::Number(4.0)
            ]
        );
    }

    #[test]
    fn case_sheet_leads_with_identifiers() {
        let table = NormalizedTable {
            source: "base".into(),
            granularity: Granularity::Hourly,
            keys: vec![3648, 3649],
            is_summer_period: Some(vec![false, true]),
            columns: vec![Series::new("Wind_Electr.", vec![Some(1.5), None])],
        };
        let sheet = case_sheet(&table, "base".into());
        assert_eq!(
            sheet.columns,
            vec!["hour", "source", "is_summer_period", "Wind_Electr."]
        );
        assert_eq!(
            sheet.rows[1],
            vec![
                CellValue::Number(3649.0),
                CellValue::Text("base".into()),
                CellValue::Bool(true),
                CellValue::Empty,
            ]
        );
    }

    #[test]
    fn headers_are_made_unique() {
        let headers = vec!["case".to_string(), "Case".to_string(), " ".to_string()];
        assert_eq!(unique_headers(headers), vec!["case", "Case (2)", "Column3"]);
    }
}
