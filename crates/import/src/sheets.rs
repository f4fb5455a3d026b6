use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Unified customer schema every source sheet is mapped onto, in output
/// column order.
pub const UNIFIED_COLUMNS: [&str; 15] = [
    "Plan number",
    "Phone Numbers",
    "Name",
    "Address",
    "Area",
    "Postcode",
    "Email",
    "Plan",
    "Total Cost",
    "Sort Code",
    "Account number",
    "DD Date",
    "Notes",
    "Agents",
    "Source File",
];

fn unified_index(column: &str) -> Option<usize> {
    UNIFIED_COLUMNS.iter().position(|c| *c == column)
}

/// One column of a source sheet, matched either by header name or by
/// position and written into `target` in the unified schema. Header
/// mappings double as renames ("TMP" → "Total Cost") and spelling fixes
/// ("Adress" → "Address").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetProfile {
    /// Stamped into the Source File column of every row.
    pub label: String,
    #[serde(default = "default_true")]
    pub has_header: bool,
    pub columns: Vec<ColumnMap>,
}

fn default_true() -> bool {
    true
}

impl SheetProfile {
    /// Every mapping target must exist in the unified schema; a typo in a
    /// profile should fail loudly, not silently drop a column.
    pub fn validate(&self) -> Result<(), ImportError> {
        for map in &self.columns {
            if unified_index(&map.target).is_none() {
                return Err(ImportError::UnknownColumn(map.target.clone()));
            }
        }
        Ok(())
    }
}

/// Parse a list of sheet profiles from TOML (`[[sheets]]` tables).
pub fn profiles_from_toml(content: &str) -> Result<Vec<SheetProfile>, ImportError> {
    #[derive(Deserialize)]
    struct Profiles {
        sheets: Vec<SheetProfile>,
    }
    let parsed: Profiles = toml::from_str(content)?;
    for profile in &parsed.sheets {
        profile.validate()?;
    }
    Ok(parsed.sheets)
}

/// Read one source sheet and map it onto the unified schema. Returns one
/// row per non-empty input row, aligned with `UNIFIED_COLUMNS`. Rows whose
/// cells are all blank are skipped. A positional mapping never overwrites
/// a value a header mapping already set.
pub fn read_sheet<R: Read>(
    data: R,
    profile: &SheetProfile,
) -> Result<Vec<Vec<String>>, ImportError> {
    profile.validate()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);
    let mut records = reader.records();

    // The header row is consumed manually so header-name and positional
    // mappings can mix within one sheet.
    let headers: Vec<String> = if profile.has_header {
        match records.next() {
            Some(first) => first?.iter().map(|s| s.trim().to_string()).collect(),
            None => return Ok(Vec::new()),
        }
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut row = vec![String::new(); UNIFIED_COLUMNS.len()];
        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                let by_header = profile.columns.iter().find_map(|m| {
                    (m.header.as_deref() == Some(header.as_str())).then_some(m.target.as_str())
                });
                if let Some(target) = by_header {
                    row[unified_index(target).unwrap()] = value.trim().to_string();
                }
            }

            let by_index = profile
                .columns
                .iter()
                .find_map(|m| (m.index == Some(col_idx)).then_some(m.target.as_str()));
            if let Some(target) = by_index {
                let slot = &mut row[unified_index(target).unwrap()];
                if slot.is_empty() {
                    *slot = value.trim().to_string();
                }
            }
        }

        row[unified_index("Source File").unwrap()] = profile.label.clone();
        rows.push(row);
    }

    tracing::info!(label = %profile.label, rows = rows.len(), "source sheet read");

    Ok(rows)
}

/// Write merged rows under the unified header.
pub fn write_combined<W: Write>(out: W, rows: &[Vec<String>]) -> Result<(), ImportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(UNIFIED_COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
