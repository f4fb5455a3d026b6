use std::fmt::Write;

use crate::stats::{AgentSummary, ExtensionStats, IdlePeriod};

/// Human-friendly duration: "45s", "3m 20s", "2h 15m".
pub fn format_seconds(seconds: i64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Arial, sans-serif; margin: 2em; color: #222; }
h1 { border-bottom: 3px solid #2c5f8a; padding-bottom: 0.3em; }
h2 { color: #2c5f8a; margin-top: 2em; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #ccc; padding: 0.4em 0.9em; text-align: left; }
th { background: #2c5f8a; color: #fff; }
tr:nth-child(even) { background: #f4f7fa; }
.cards { display: flex; flex-wrap: wrap; gap: 1em; margin: 1em 0; }
.card { background: #f4f7fa; border-left: 4px solid #2c5f8a; padding: 0.8em 1.2em; min-width: 9em; }
.card .value { font-size: 1.6em; font-weight: bold; }
.card .label { color: #666; font-size: 0.85em; }
";

fn stat_card(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        "<div class=\"card\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>",
        escape(value),
        escape(label)
    );
}

fn bucket_table(out: &mut String, heading: &str, rows: &[(String, usize, i64)]) {
    let _ = write!(out, "<h2>{}</h2><table>", escape(heading));
    let _ = write!(
        out,
        "<tr><th></th><th>Calls</th><th>Duration</th><th>Avg</th></tr>"
    );
    for (label, calls, duration_secs) in rows {
        let avg = if *calls == 0 {
            0
        } else {
            duration_secs / *calls as i64
        };
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(label),
            calls,
            format_seconds(*duration_secs),
            format_seconds(avg)
        );
    }
    out.push_str("</table>");
}

fn extension_section(out: &mut String, stats: &ExtensionStats, idle: &[IdlePeriod]) {
    let _ = write!(out, "<h1>Extension {}</h1>", escape(&stats.extension));

    out.push_str("<div class=\"cards\">");
    stat_card(out, "Total calls", &stats.total_calls.to_string());
    stat_card(out, "Total duration", &format_seconds(stats.total_duration_secs));
    stat_card(
        out,
        "Average duration",
        &format_seconds(stats.average_duration_secs() as i64),
    );
    stat_card(out, "Answered", &stats.answered.to_string());
    stat_card(out, "Missed", &stats.missed.to_string());
    stat_card(out, "Answer rate", &format!("{:.1}%", stats.answer_rate()));
    out.push_str("</div>");

    // Idle time between same-day calls.
    let total_idle: i64 = idle.iter().map(|p| p.idle_secs).sum();
    let longest = idle.iter().map(|p| p.idle_secs).max().unwrap_or(0);
    let average = if idle.is_empty() {
        0
    } else {
        total_idle / idle.len() as i64
    };
    out.push_str("<h2>Idle time between calls</h2><div class=\"cards\">");
    stat_card(out, "Idle periods", &idle.len().to_string());
    stat_card(out, "Total idle", &format_seconds(total_idle));
    stat_card(out, "Average gap", &format_seconds(average));
    stat_card(out, "Longest gap", &format_seconds(longest));
    out.push_str("</div>");

    let hour_rows: Vec<(String, usize, i64)> = stats
        .by_hour
        .iter()
        .map(|(hour, b)| (format!("{hour:02}:00"), b.calls, b.duration_secs))
        .collect();
    bucket_table(out, "Calls by hour", &hour_rows);

    let day_rows: Vec<(String, usize, i64)> = stats
        .by_day
        .iter()
        .map(|(day, b)| (day.clone(), b.calls, b.duration_secs))
        .collect();
    bucket_table(out, "Calls by day of week", &day_rows);

    let date_rows: Vec<(String, usize, i64)> = stats
        .by_date
        .iter()
        .map(|(date, b)| (date.clone(), b.calls, b.duration_secs))
        .collect();
    bucket_table(out, "Calls by date", &date_rows);
}

/// Self-contained static HTML report: one section per focus extension,
/// then the cross-agent comparison table.
pub fn render_html(focus: &[(ExtensionStats, Vec<IdlePeriod>)], agents: &[AgentSummary]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    out.push_str("<title>Call Statistics Report</title>");
    let _ = write!(out, "<style>{STYLE}</style>");
    out.push_str("</head><body>");

    for (stats, idle) in focus {
        extension_section(&mut out, stats, idle);
    }

    out.push_str("<h1>All agents</h1><table>");
    out.push_str(
        "<tr><th>Ext</th><th>Calls</th><th>Duration</th><th>Avg</th><th>Answered</th><th>Answer %</th></tr>",
    );
    for agent in agents {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
            escape(&agent.extension),
            agent.calls,
            format_seconds(agent.duration_secs),
            format_seconds(agent.average_secs() as i64),
            agent.answered,
            agent.answer_rate()
        );
    }
    out.push_str("</table></body></html>");

    out
}
