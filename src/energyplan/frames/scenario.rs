use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::energyplan::frames::error::{FrameError, Result};

const BYTE_ORDER_MARK: u16 = 0xFEFF;
const NAME_SUFFIX: char = '=';

/// A parameter value as written to an EnergyPLAN input file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(value) => write!(f, "{value}"),
            // Whole floats keep their decimal so the tool reads them as reals.
            ParamValue::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            ParamValue::Float(value) => write!(f, "{value}"),
            ParamValue::Text(value) => f.write_str(value.trim_end_matches(['\r', '\n'])),
        }
    }
}

/// Parameter overrides for a set of scenario cases.
///
/// ```json
/// {
///   "base": { "Input_el_demand_Twh": 42.5 },
///   "cases": {
///     "base": {},
///     "shock": { "Input_fuel_Price_Ngas": 14.2 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioParams {
    /// Values shared by every case.
    pub base: BTreeMap<String, ParamValue>,
    /// Per-case values applied on top of `base`.
    pub cases: BTreeMap<String, BTreeMap<String, ParamValue>>,
}

impl ScenarioParams {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FrameError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Base values merged with the overrides of `case`. Case values win.
    pub fn for_case(&self, case: &str) -> Result<BTreeMap<String, ParamValue>> {
        let overrides = self.cases.get(case).ok_or_else(|| FrameError::UnknownCase {
            case: case.to_string(),
            known: self.cases.keys().cloned().collect(),
        })?;

        let mut params = self.base.clone();
        params.extend(overrides.iter().map(|(name, value)| (name.clone(), value.clone())));
        Ok(params)
    }
}

/// An EnergyPLAN input file: parameter names and values on alternating lines,
/// each name carrying a trailing `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFile {
    /// Lines including their terminators.
    lines: Vec<String>,
    /// Parameter name (without `=`) to the line holding its value.
    value_index: BTreeMap<String, usize>,
}

impl InputFile {
    /// Reads a UTF-16 encoded input file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FrameError::MissingInput(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let text =
            decode_utf16(&bytes).ok_or_else(|| FrameError::InvalidEncoding(path.to_path_buf()))?;
        let input = Self::parse(&text);
        debug!(
            path = %path.display(),
            lines = input.lines.len(),
            parameters = input.value_index.len(),
            "read input file"
        );
        Ok(input)
    }

    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        let value_index = (0..lines.len().saturating_sub(1))
            .step_by(2)
            .map(|index| {
                let name = lines[index].trim().trim_end_matches(NAME_SUFFIX);
                (name.to_string(), index + 1)
            })
            .collect();
        Self { lines, value_index }
    }

    pub fn parameter_count(&self) -> usize {
        self.value_index.len()
    }

    /// Current value of a parameter, without its line terminator.
    pub fn value(&self, name: &str) -> Option<&str> {
        let index = *self.value_index.get(name)?;
        self.lines
            .get(index)
            .map(|line| line.trim_end_matches(['\r', '\n']))
    }

    /// Replaces the values of `params`. Every name must already be present in
    /// the file; nothing is changed otherwise.
    pub fn apply(&mut self, params: &BTreeMap<String, ParamValue>, path: &Path) -> Result<usize> {
        if let Some(name) = params.keys().find(|name| !self.value_index.contains_key(*name)) {
            return Err(FrameError::UnknownParameter {
                path: path.to_path_buf(),
                name: name.clone(),
            });
        }

        for (name, value) in params {
            let Some(&index) = self.value_index.get(name) else {
                continue;
            };
            let line = &mut self.lines[index];
            let terminator = line_terminator(line);
            *line = format!("{value}{terminator}");
        }
        Ok(params.len())
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Writes the file back as UTF-16 with a byte order mark.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, encode_utf16(&self.to_text()))?;
        Ok(())
    }
}

/// Writes `template` with the parameters of `case` applied to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(template = %template.display(), %case, output = %output.display())
)]
pub fn write_scenario(
    template: &Path,
    params: &ScenarioParams,
    case: &str,
    output: &Path,
) -> Result<usize> {
    let values = params.for_case(case)?;
    let mut input = InputFile::load(template)?;
    let changed = input.apply(&values, template)?;
    input.save(output)?;
    info!(
        changed,
        parameters = input.parameter_count(),
        "wrote scenario input"
    );
    Ok(changed)
}

fn line_terminator(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Decodes UTF-16 honouring a byte order mark; little endian without one.
fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let big_endian = bytes.starts_with(&[0xFE, 0xFF]);
    let units = bytes.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });
    let units: Vec<u16> = units.collect();
    let units = match units.first() {
        Some(&BYTE_ORDER_MARK) => &units[1..],
        _ => &units[..],
    };
    String::from_utf16(units).ok()
}

fn encode_utf16(text: &str) -> Vec<u8> {
    std::iter::once(BYTE_ORDER_MARK)
        .chain(text.encode_utf16())
        .flat_map(u16::to_le_bytes)
        .collect()
}
