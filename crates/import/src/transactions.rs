use std::io::Read;

use ddsuite_core::{parse_amount, Money};
use serde::Deserialize;

use crate::error::ImportError;

/// Classification code marking a direct-debit "new instruction" setup row.
/// These are administrative, not payments, and never enter matching.
pub const NEW_INSTRUCTION_CODE: &str = "0N";

/// Header names of the transaction export. Defaults follow the bank's
/// download format; override when a provider renames columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransactionColumns {
    pub reference: String,
    pub account_name: String,
    pub amount: String,
    pub code: String,
    pub collection_date: String,
}

impl Default for TransactionColumns {
    fn default() -> Self {
        Self {
            reference: "DD Reference".to_string(),
            account_name: "Account Name".to_string(),
            amount: "Amount".to_string(),
            code: "Bacs Code".to_string(),
            collection_date: "Collection Date".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Unique direct-debit reference. May be empty, in which case the
    /// transaction can never be exclusively claimed.
    pub reference: String,
    pub account_name: String,
    pub amount: Money,
    /// Original amount text, re-emitted verbatim on a match.
    pub amount_raw: String,
    pub collection_date: String,
    pub code: String,
}

#[derive(Debug)]
pub struct TransactionLoad {
    pub transactions: Vec<TransactionRecord>,
    /// New-instruction rows dropped by the pre-filter.
    pub excluded: usize,
}

/// Load the transaction export, excluding new-instruction rows on the
/// classification code alone (trimmed, case-insensitive) regardless of
/// their amount.
pub fn read_transactions<R: Read>(
    data: R,
    columns: &TransactionColumns,
) -> Result<TransactionLoad, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
    };

    let ref_idx = find(&columns.reference)?;
    let name_idx = find(&columns.account_name)?;
    let amount_idx = find(&columns.amount)?;
    let code_idx = find(&columns.code)?;
    // Collection date is passthrough-only; a missing column yields empty cells.
    let date_idx = headers.iter().position(|h| h == columns.collection_date);

    let mut transactions = Vec::new();
    let mut excluded = 0usize;

    for result in reader.records() {
        let record = result?;
        let code = record.get(code_idx).unwrap_or_default();
        if code.trim().eq_ignore_ascii_case(NEW_INSTRUCTION_CODE) {
            excluded += 1;
            continue;
        }

        let amount_raw = record.get(amount_idx).unwrap_or_default().to_string();
        transactions.push(TransactionRecord {
            reference: record.get(ref_idx).unwrap_or_default().to_string(),
            account_name: record.get(name_idx).unwrap_or_default().to_string(),
            amount: parse_amount(&amount_raw).value(),
            code: code.to_string(),
            amount_raw,
            collection_date: date_idx
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string(),
        });
    }

    tracing::info!(
        loaded = transactions.len(),
        excluded,
        "transaction export read"
    );

    Ok(TransactionLoad {
        transactions,
        excluded,
    })
}
