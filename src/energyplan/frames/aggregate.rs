use tracing::debug;

use crate::energyplan::frames::model::{NormalizedTable, Series};

/// A technology-level column and the unit columns it is summed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGroup {
    pub target: &'static str,
    pub units: &'static [&'static str],
}

/// District heating units reported per area by the export.
pub const HEAT_UNIT_GROUPS: &[UnitGroup] = &[
    UnitGroup {
        target: "Solar_tot_Heat",
        units: &["Solar_Heat", "Solar2_Heat"],
    },
    UnitGroup {
        target: "CSHP_tot_Heat",
        units: &["CSHP 2_Heat", "CSHP 3_Heat"],
    },
    UnitGroup {
        target: "CHP_tot_Heat",
        units: &["CHP 2_Heat", "CHP 3_Heat"],
    },
    UnitGroup {
        target: "HP_tot_Heat",
        units: &["HP 2_Heat", "HP 3_Heat"],
    },
    UnitGroup {
        target: "Storage_Heat",
        units: &["Storage2_Heat", "Storage3_Heat"],
    },
];

/// Sums every group's unit columns into its target column and drops the unit
/// columns afterwards.
///
/// Units absent from the table contribute nothing, missing cells are skipped
/// and a group without any present unit adds no column. A target that already
/// exists is replaced in place, otherwise it is appended. Running the function
/// on its own output changes nothing because no unit columns are left.
pub fn aggregate_units(mut table: NormalizedTable, groups: &[UnitGroup]) -> NormalizedTable {
    let rows = table.row_count();

    for group in groups {
        let present: Vec<&Series> = group
            .units
            .iter()
            .filter_map(|unit| table.column(unit))
            .collect();
        if present.is_empty() {
            continue;
        }

        let values = (0..rows)
            .map(|row| {
                let total = present
                    .iter()
                    .filter_map(|series| series.values.get(row).copied().flatten())
                    .sum::<f64>();
                Some(total)
            })
            .collect();
        debug!(
            column = group.target,
            units = present.len(),
            "aggregated unit columns"
        );

        let aggregate = Series::new(group.target, values);
        match table
            .columns
            .iter_mut()
            .find(|series| series.name == group.target)
        {
            Some(existing) => *existing = aggregate,
            None => table.columns.push(aggregate),
        }
    }

    table.columns.retain(|series| {
        !groups
            .iter()
            .any(|group| group.units.contains(&series.name.as_str()))
    });
    table
}
