use std::io::Read;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::ReportError;

/// One row of the phone system's call export, keyed by the agent extension
/// it originated from.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub extension: String,
    pub call_type: String,
    pub date: String,
    pub time: String,
    pub day_of_week: String,
    pub duration_seconds: i64,
    pub call_result: String,
    /// Parsed from the Date + Time cells; None when either is malformed.
    pub timestamp: Option<NaiveDateTime>,
}

fn digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

/// Extension number from the export's `From` field ("Ext 1001", "John
/// (Ext 1002)" and similar). The field must mention "Ext"; the first
/// all-digit whitespace token wins.
pub fn extract_extension(from: &str) -> Option<String> {
    if !from.contains("Ext") {
        return None;
    }
    from.split_whitespace()
        .find(|token| digits().is_match(token))
        .map(|token| token.to_string())
}

fn parse_duration_seconds(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Hour bucket from a "13:19:41" time cell; None when malformed.
pub fn hour_of(time: &str) -> Option<u32> {
    let hour: u32 = time.split(':').next()?.trim().parse().ok()?;
    (hour < 24).then_some(hour)
}

// The export writes "08 Jan 2026" dates and "13:19:41" times.
fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%d %b %Y %H:%M:%S").ok()
}

/// Read the call export. Rows whose `From` field carries no extension are
/// not agent calls and are dropped; every other cell is tolerated missing.
pub fn read_calls<R: Read>(data: R) -> Result<Vec<CallRecord>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let from_idx = col("From").ok_or_else(|| ReportError::MissingColumn("From".to_string()))?;
    let type_idx = col("Call Type");
    let date_idx = col("Date");
    let time_idx = col("Time");
    let day_idx = col("Day Of Week");
    let secs_idx = col("Duration (Seconds)");
    let result_idx = col("Call Result");

    let get = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i)).unwrap_or_default().to_string()
    };

    let mut calls = Vec::new();
    for result in reader.records() {
        let record = result?;
        let Some(extension) = extract_extension(record.get(from_idx).unwrap_or_default()) else {
            continue;
        };

        let date = get(&record, date_idx);
        let time = get(&record, time_idx);
        calls.push(CallRecord {
            extension,
            call_type: get(&record, type_idx),
            day_of_week: get(&record, day_idx),
            duration_seconds: parse_duration_seconds(&get(&record, secs_idx)),
            call_result: get(&record, result_idx),
            timestamp: parse_timestamp(&date, &time),
            date,
            time,
        });
    }

    tracing::info!(loaded = calls.len(), "call export read");

    Ok(calls)
}
