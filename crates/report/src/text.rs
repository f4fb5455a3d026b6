use std::fmt::Write;

use crate::stats::{rank_of, AgentSummary, ExtensionStats};

const RULE: &str = "--------------------------------------------------------------------------------";

/// Plain-text call report for the terminal: per-extension breakdowns for
/// the focus agents, then the cross-agent comparison and rankings.
pub fn render_text(focus: &[ExtensionStats], agents: &[AgentSummary]) -> String {
    let mut out = String::new();

    for stats in focus {
        let _ = writeln!(out, "DETAILED ANALYSIS: Extension {}", stats.extension);
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "  Total Calls:      {}", stats.total_calls);
        let _ = writeln!(
            out,
            "  Total Duration:   {:.2} minutes ({} seconds)",
            stats.total_duration_secs as f64 / 60.0,
            stats.total_duration_secs
        );
        let _ = writeln!(
            out,
            "  Average Duration: {:.1} seconds",
            stats.average_duration_secs()
        );
        let _ = writeln!(out, "  Answered Calls:   {}", stats.answered);
        let _ = writeln!(out, "  Missed Calls:     {}", stats.missed);

        let _ = writeln!(out, "\n  CALL TYPES");
        for (call_type, count) in &stats.by_type {
            let pct = *count as f64 / stats.total_calls.max(1) as f64 * 100.0;
            let _ = writeln!(out, "    {call_type:<15} {count:>4} calls ({pct:>5.1}%)");
        }

        let _ = writeln!(out, "\n  CALL RESULTS");
        for (result, count) in &stats.by_result {
            let pct = *count as f64 / stats.total_calls.max(1) as f64 * 100.0;
            let _ = writeln!(out, "    {result:<15} {count:>4} calls ({pct:>5.1}%)");
        }

        let _ = writeln!(out, "\n  CALLS BY HOUR");
        let _ = writeln!(out, "    {:<6} {:>6} {:>15} {:>10}", "Hour", "Calls", "Duration (min)", "Avg (sec)");
        for (hour, bucket) in &stats.by_hour {
            let _ = writeln!(
                out,
                "    {hour:02}:00  {:>6} {:>15.2} {:>10.1}",
                bucket.calls,
                bucket.duration_secs as f64 / 60.0,
                bucket.average_secs()
            );
        }

        let _ = writeln!(out, "\n  CALLS BY DAY OF WEEK");
        for (day, bucket) in &stats.by_day {
            let _ = writeln!(
                out,
                "    {day:<12} {:>6} {:>15.2} {:>10.1}",
                bucket.calls,
                bucket.duration_secs as f64 / 60.0,
                bucket.average_secs()
            );
        }

        let _ = writeln!(out, "\n  CALLS BY DATE");
        for (date, bucket) in &stats.by_date {
            let _ = writeln!(
                out,
                "    {date:<14} {:>6} {:>15.2} {:>10.1}",
                bucket.calls,
                bucket.duration_secs as f64 / 60.0,
                bucket.average_secs()
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "COMPARISON WITH ALL AGENTS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "  {:<8} {:>6} {:>15} {:>10} {:>9} {:>9}",
        "Ext", "Calls", "Duration (min)", "Avg (sec)", "Answered", "Answer %"
    );
    for agent in agents {
        let _ = writeln!(
            out,
            "  {:<8} {:>6} {:>15.2} {:>10.1} {:>9} {:>9.1}",
            agent.extension,
            agent.calls,
            agent.duration_secs as f64 / 60.0,
            agent.average_secs(),
            agent.answered,
            agent.answer_rate()
        );
    }

    let _ = writeln!(out, "\nRANKINGS");
    let _ = writeln!(out, "{RULE}");
    for stats in focus {
        let ext = &stats.extension;
        if let Some(rank) = rank_of(agents, ext, |s| s.calls as f64) {
            let _ = writeln!(out, "  Ext {ext} - #{rank} by total calls");
        }
        if let Some(rank) = rank_of(agents, ext, |s| s.duration_secs as f64) {
            let _ = writeln!(out, "  Ext {ext} - #{rank} by total duration");
        }
        if let Some(rank) = rank_of(agents, ext, AgentSummary::average_secs) {
            let _ = writeln!(out, "  Ext {ext} - #{rank} by average duration");
        }
        if let Some(rank) = rank_of(agents, ext, AgentSummary::answer_rate) {
            let _ = writeln!(out, "  Ext {ext} - #{rank} by answer rate");
        }
    }

    out
}
