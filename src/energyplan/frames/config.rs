use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::energyplan::frames::error::{FrameError, Result};

/// Directory the simulation runs are stored in, relative to the working
/// directory.
pub const DEFAULT_INPUT_DIR: &str = "0_EP_runs";

/// Display names handed to the presentation side.
///
/// ```json
/// {
///   "cases": { "base": "Reference 2030" },
///   "technologies": { "Storage_Heat": "Thermal storage" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Case id (workbook base name) to scenario name.
    pub cases: BTreeMap<String, String>,
    /// Column name to technology name.
    pub technologies: BTreeMap<String, String>,
}

impl Labels {
    /// Loads labels from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FrameError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn case<'a>(&'a self, id: &'a str) -> &'a str {
        self.cases.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn technology<'a>(&'a self, column: &'a str) -> &'a str {
        self.technologies
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }
}
