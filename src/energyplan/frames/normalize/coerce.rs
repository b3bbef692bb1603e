use crate::energyplan::frames::model::Cell;

/// How textual numbers are written in the source cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// `1234.5`
    #[default]
    DecimalPoint,
    /// `1.234,5` as well as plain `1234.5`. A `.` after the comma is rejected.
    DecimalComma,
}

/// Converts a cell to a number. Anything that cannot be parsed is missing.
pub fn coerce_cell(cell: &Cell, format: NumberFormat) -> Option<f64> {
    let value = match cell {
        Cell::Empty => return None,
        Cell::Number(value) => *value,
        Cell::Bool(value) => f64::from(u8::from(*value)),
        Cell::Text(text) => parse_text(text, format)?,
    };
    value.is_finite().then_some(value)
}

/// Converts a column of cells.
pub fn coerce_column<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    format: NumberFormat,
) -> Vec<Option<f64>> {
    cells
        .into_iter()
        .map(|cell| coerce_cell(cell, format))
        .collect()
}

/// Reads a whole-number key such as an hour of the year.
pub fn coerce_key(cell: &Cell) -> Option<u32> {
    let value = coerce_cell(cell, NumberFormat::DecimalPoint)?;
    let in_range = value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX);
    in_range.then_some(value as u32)
}

fn parse_text(text: &str, format: NumberFormat) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match format {
        NumberFormat::DecimalComma if trimmed.contains(',') => {
            // `.` may only group thousands ahead of the decimal comma.
            let last_comma = trimmed.rfind(',')?;
            if trimmed.matches(',').count() > 1 || trimmed[last_comma..].contains('.') {
                return None;
            }
            let normalized: String = trimmed
                .chars()
                .filter(|ch| *ch != '.')
                .map(|ch| if ch == ',' { '.' } else { ch })
                .collect();
            normalized.parse().ok()
        }
        _ => trimmed.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn unparseable_cells_become_missing() {
        let format = NumberFormat::DecimalPoint;
        assert_eq!(coerce_cell(&Cell::Number(4.5), format), Some(4.5));
        assert_eq!(coerce_cell(&text(" 12.25 "), format), Some(12.25));
        assert_eq!(coerce_cell(&text("Average"), format), None);
        assert_eq!(coerce_cell(&text(""), format), None);
        assert_eq!(coerce_cell(&Cell::Empty, format), None);
        assert_eq!(coerce_cell(&text("NaN"), format), None);
    }

    #[test]
    fn decimal_comma_is_accepted_when_requested() {
        assert_eq!(coerce_cell(&text("3,75"), NumberFormat::DecimalComma), Some(3.75));
        assert_eq!(
            coerce_cell(&text("1.234,5"), NumberFormat::DecimalComma),
            Some(1234.5)
        );
        assert_eq!(coerce_cell(&text("0.5"), NumberFormat::DecimalComma), Some(0.5));
        assert_eq!(coerce_cell(&text("3,75"), NumberFormat::DecimalPoint), None);
    }

    #[test]
    fn mixed_separators_are_not_guessed() {
        let format = NumberFormat::DecimalComma;
        assert_eq!(coerce_cell(&text("1,234.5"), format), None);
        assert_eq!(coerce_cell(&text("1,234,5"), format), None);
        assert_eq!(coerce_cell(&text("12.345.678,9"), format), Some(12345678.9));
    }

    #[test]
    fn keys_must_be_whole_numbers() {
        assert_eq!(coerce_key(&Cell::Number(3649.0)), Some(3649));
        assert_eq!(coerce_key(&text("12")), Some(12));
        assert_eq!(coerce_key(&Cell::Number(1.5)), None);
        assert_eq!(coerce_key(&Cell::Number(-1.0)), None);
        assert_eq!(coerce_key(&text("Jan")), None);
    }
}
