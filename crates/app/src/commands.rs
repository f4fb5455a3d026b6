use std::fs::File;

use anyhow::Context;
use ddsuite_import::{
    read_customers, read_sheet, read_transactions, write_combined, write_matched,
    CustomerColumns, MatchEngine, TransactionColumns,
};
use ddsuite_report::{
    compute, group_by_customer, idle_periods, partition, read_calls, render_html, render_text,
    summarize_agents, write_grouped,
};

use crate::config::{CallsConfig, GroupConfig, MatchConfig, MergeConfig};

/// Merge the source sheets into one combined customer spreadsheet. A
/// missing source file is skipped with a warning; the rest still merge.
pub fn run_merge(config: &MergeConfig) -> anyhow::Result<()> {
    let mut all_rows = Vec::new();

    for sheet in &config.sheets {
        if !sheet.path.exists() {
            tracing::warn!(path = %sheet.path.display(), "source sheet not found, skipping");
            continue;
        }
        let file = File::open(&sheet.path)
            .with_context(|| format!("opening {}", sheet.path.display()))?;
        let rows = read_sheet(file, &sheet.profile)?;
        all_rows.extend(rows);
    }

    let out = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    write_combined(out, &all_rows)?;

    tracing::info!(
        rows = all_rows.len(),
        output = %config.output.display(),
        "merge complete"
    );
    Ok(())
}

/// Match customers against direct-debit transactions and re-emit the
/// customer table with the match columns appended.
pub fn run_match(config: &MatchConfig) -> anyhow::Result<()> {
    let customers_file = File::open(&config.customers)
        .with_context(|| format!("opening {}", config.customers.display()))?;
    let table = read_customers(customers_file, &CustomerColumns::default())?;

    let transactions_file = File::open(&config.transactions)
        .with_context(|| format!("opening {}", config.transactions.display()))?;
    let load = read_transactions(transactions_file, &TransactionColumns::default())?;

    let outcomes = MatchEngine::default().match_all(&table, &load.transactions);
    let matched = outcomes.iter().filter(|o| o.is_matched()).count();

    let out = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    write_matched(out, &table, &outcomes)?;

    tracing::info!(
        customers = table.rows.len(),
        transactions = load.transactions.len(),
        matched,
        unmatched = table.rows.len() - matched,
        output = %config.output.display(),
        "matching complete"
    );
    Ok(())
}

/// Group the matched table by customer with subtotal rows.
pub fn run_group(config: &GroupConfig) -> anyhow::Result<()> {
    let input = File::open(&config.input)
        .with_context(|| format!("opening {}", config.input.display()))?;
    let report = group_by_customer(input)?;

    let out = File::create(&config.output)
        .with_context(|| format!("creating {}", config.output.display()))?;
    write_grouped(out, &report)?;

    tracing::info!(
        customers = report.unique_customers,
        multi_record = report.multi_record_customers,
        output = %config.output.display(),
        "grouping complete"
    );
    Ok(())
}

/// Print the plain-text call statistics report to stdout.
pub fn run_call_stats(config: &CallsConfig) -> anyhow::Result<()> {
    let input = File::open(&config.input)
        .with_context(|| format!("opening {}", config.input.display()))?;
    let calls = read_calls(input)?;
    let by_extension = partition(&calls);

    let focus: Vec<_> = config
        .focus
        .iter()
        .filter_map(|ext| by_extension.get(ext).map(|calls| compute(ext, calls)))
        .collect();
    let agents = summarize_agents(&by_extension);

    print!("{}", render_text(&focus, &agents));
    Ok(())
}

/// Write the HTML call report, including idle-time analysis.
pub fn run_call_report(config: &CallsConfig) -> anyhow::Result<()> {
    let input = File::open(&config.input)
        .with_context(|| format!("opening {}", config.input.display()))?;
    let calls = read_calls(input)?;
    let by_extension = partition(&calls);

    let focus: Vec<_> = config
        .focus
        .iter()
        .filter_map(|ext| {
            by_extension
                .get(ext)
                .map(|calls| (compute(ext, calls), idle_periods(calls)))
        })
        .collect();
    let agents = summarize_agents(&by_extension);

    let html = render_html(&focus, &agents);
    std::fs::write(&config.report, html)
        .with_context(|| format!("writing {}", config.report.display()))?;

    tracing::info!(
        extensions = by_extension.len(),
        output = %config.report.display(),
        "call report written"
    );
    Ok(())
}
