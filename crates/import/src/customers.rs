use std::io::{Read, Write};

use ddsuite_core::{parse_amount, Money};
use serde::Deserialize;

use crate::error::ImportError;
use crate::match_engine::MatchOutcome;

/// Header names the match step needs from the customer table. Everything
/// else is passthrough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomerColumns {
    pub name: String,
    pub cost: String,
}

impl Default for CustomerColumns {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            cost: "Total Cost".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRow {
    /// Original cells, re-emitted untouched in the output.
    pub fields: Vec<String>,
    pub name: String,
    pub expected: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerTable {
    pub headers: Vec<String>,
    pub rows: Vec<CustomerRow>,
}

/// Columns the match step appends to the customer table.
pub const MATCH_COLUMNS: [&str; 5] = [
    "Matched DD Reference",
    "Matched Collection Date",
    "Matched Amount",
    "Amount Difference",
    "Match Score",
];

pub fn read_customers<R: Read>(
    data: R,
    columns: &CustomerColumns,
) -> Result<CustomerTable, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let name_idx = headers
        .iter()
        .position(|h| h == &columns.name)
        .ok_or_else(|| ImportError::MissingColumn(columns.name.clone()))?;
    let cost_idx = headers
        .iter()
        .position(|h| h == &columns.cost)
        .ok_or_else(|| ImportError::MissingColumn(columns.cost.clone()))?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        let name = fields.get(name_idx).cloned().unwrap_or_default();
        let expected = parse_amount(fields.get(cost_idx).map(String::as_str).unwrap_or(""));
        rows.push(CustomerRow {
            fields,
            name,
            expected: expected.value(),
        });
    }

    tracing::info!(loaded = rows.len(), "customer table read");

    Ok(CustomerTable { headers, rows })
}

/// Re-emit the customer table with the five match columns appended. The
/// skip ("no match attempted") and the miss ("no match found") both come
/// out as empty cells.
pub fn write_matched<W: Write>(
    out: W,
    table: &CustomerTable,
    outcomes: &[MatchOutcome],
) -> Result<(), ImportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    let mut header_row = table.headers.clone();
    header_row.extend(MATCH_COLUMNS.iter().map(|s| s.to_string()));
    writer.write_record(&header_row)?;

    for (row, outcome) in table.rows.iter().zip(outcomes) {
        let mut record = row.fields.clone();
        // Ragged input rows are padded to the header width before appending.
        record.resize(table.headers.len(), String::new());
        match outcome {
            MatchOutcome::Matched(m) => {
                record.push(m.reference.clone());
                record.push(m.collection_date.clone());
                record.push(m.amount_raw.clone());
                record.push(m.difference.to_plain_string());
                record.push(format!("{:.2}", m.score));
            }
            MatchOutcome::NotAttempted | MatchOutcome::NoMatch => {
                record.extend(std::iter::repeat(String::new()).take(MATCH_COLUMNS.len()));
            }
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
