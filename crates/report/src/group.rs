use std::collections::BTreeMap;
use std::io::{Read, Write};

use ddsuite_core::{parse_amount, Money};

use crate::error::ReportError;

/// The matched table re-ordered by customer, with a totals row and a blank
/// separator after each customer's records.
#[derive(Debug)]
pub struct GroupedReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub unique_customers: usize,
    pub multi_record_customers: usize,
}

const NAME_COLUMN: &str = "Name";
const SUMMED_COLUMNS: [&str; 3] = ["Total Cost", "Matched Amount", "Amount Difference"];

/// Group matched rows by exact (trimmed) customer name, sorted by name.
/// Rows with a blank name are dropped.
pub fn group_by_customer<R: Read>(data: R) -> Result<GroupedReport, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let name_idx = headers
        .iter()
        .position(|h| h == NAME_COLUMN)
        .ok_or_else(|| ReportError::MissingColumn(NAME_COLUMN.to_string()))?;
    let summed: Vec<Option<usize>> = SUMMED_COLUMNS
        .iter()
        .map(|c| headers.iter().position(|h| h == c))
        .collect();

    let mut groups: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
    for result in reader.records() {
        let record = result?;
        let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        let name = fields.get(name_idx).map(|n| n.trim()).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        groups.entry(name.to_string()).or_default().push(fields);
    }

    let unique_customers = groups.len();
    let mut multi_record_customers = 0usize;
    let mut rows = Vec::new();

    for (name, records) in &groups {
        if records.len() > 1 {
            multi_record_customers += 1;
        }

        for record in records {
            let mut row = record.clone();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        let mut totals = vec![String::new(); headers.len()];
        let plural = if records.len() > 1 { "s" } else { "" };
        totals[name_idx] = format!(
            ">>> TOTAL FOR {name} ({count} record{plural})",
            count = records.len()
        );
        for idx in summed.iter().flatten().copied() {
            let total = records
                .iter()
                .map(|r| parse_amount(r.get(idx).map(String::as_str).unwrap_or("")).value())
                .fold(Money::zero(), |a, b| a + b);
            totals[idx] = total.to_plain_string();
        }
        rows.push(totals);
        rows.push(vec![String::new(); headers.len()]);
    }

    tracing::info!(
        unique_customers,
        multi_record_customers,
        "matched table grouped"
    );

    Ok(GroupedReport {
        headers,
        rows,
        unique_customers,
        multi_record_customers,
    })
}

pub fn write_grouped<W: Write>(out: W, report: &GroupedReport) -> Result<(), ReportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(&report.headers)?;
    for row in &report.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
