use std::collections::HashSet;

use crate::energyplan::frames::model::Cell;

/// Text used in place of an absent label.
pub const MISSING_LABEL: &str = "nan";
/// Separator between a label and its sub-label.
pub const JOIN_SEPARATOR: char = '_';

/// Collapses the label row and sub-label row into one name per column.
///
/// A present sub-label yields `"{label}_{sub_label}"`, otherwise the label is
/// used on its own. Both parts are trimmed after the presence check, so a
/// whitespace-only sub-label still produces a trailing separator
/// (`"Storage_"`), matching the names the export is usually referred to by.
/// Columns without any label are named `nan_nan`.
pub fn merge_header_rows(labels: &[Cell], sub_labels: &[Cell]) -> Vec<String> {
    let width = labels.len().max(sub_labels.len());
    (0..width)
        .map(|column| {
            let label = labels.get(column).unwrap_or(&Cell::Empty);
            let sub_label = sub_labels.get(column).unwrap_or(&Cell::Empty);
            merge_label(label, sub_label)
        })
        .collect()
}

fn merge_label(label: &Cell, sub_label: &Cell) -> String {
    if label.is_empty() && sub_label.is_empty() {
        return format!("{MISSING_LABEL}{JOIN_SEPARATOR}{MISSING_LABEL}");
    }
    let first = label_text(label);
    if sub_label.is_empty() {
        first
    } else {
        format!("{first}{JOIN_SEPARATOR}{}", label_text(sub_label))
    }
}

fn label_text(cell: &Cell) -> String {
    if cell.is_empty() {
        MISSING_LABEL.to_string()
    } else {
        cell.as_text().trim().to_string()
    }
}

/// Returns the indices of the first occurrence of every name, dropping later
/// duplicates. Names listed in `reserved` count as already taken.
pub fn first_occurrences(names: &[String], reserved: &[&str]) -> Vec<usize> {
    let mut seen: HashSet<&str> = reserved.iter().copied().collect();
    names
        .iter()
        .enumerate()
        .filter_map(|(index, name)| seen.insert(name.as_str()).then_some(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn joins_labels_with_sub_labels() {
        let labels = vec![text(" Electr. "), text("Wind"), text("Storage")];
        let sub_labels = vec![text("Demand "), text("Electr."), text(" ")];
        assert_eq!(
            merge_header_rows(&labels, &sub_labels),
            vec!["Electr._Demand", "Wind_Electr.", "Storage_"]
        );
    }

    #[test]
    fn missing_sub_label_keeps_plain_label() {
        let labels = vec![text("Boilers"), Cell::Number(2.0)];
        let sub_labels = vec![Cell::Empty];
        assert_eq!(merge_header_rows(&labels, &sub_labels), vec!["Boilers", "2"]);
    }

    #[test]
    fn degenerate_columns_get_placeholder_names() {
        let labels = vec![Cell::Empty, Cell::Empty];
        let sub_labels = vec![Cell::Empty, text("Heat")];
        assert_eq!(
            merge_header_rows(&labels, &sub_labels),
            vec!["nan_nan", "nan_Heat"]
        );
    }

    #[test]
    fn merged_names_are_trimmed() {
        let labels = vec![text("  HP 2 "), text("\tPV")];
        let sub_labels = vec![text(" Heat\n"), text("Electr. ")];
        for name in merge_header_rows(&labels, &sub_labels) {
            assert_eq!(name, name.trim());
            assert_eq!(name.matches(JOIN_SEPARATOR).count(), 1);
        }
    }

    #[test]
    fn keeps_first_of_duplicate_names() {
        let names: Vec<String> = ["hour", "A", "B", "A", "hour"]
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(first_occurrences(&names[1..], &["hour"]), vec![0, 1]);
        assert_eq!(first_occurrences(&names, &[]), vec![0, 1, 2]);
    }
}
