use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::calls::{hour_of, CallRecord};

pub const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub calls: usize,
    pub duration_secs: i64,
}

impl Bucket {
    fn add(&mut self, duration_secs: i64) {
        self.calls += 1;
        self.duration_secs += duration_secs;
    }

    pub fn average_secs(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.duration_secs as f64 / self.calls as f64
        }
    }
}

#[derive(Debug)]
pub struct ExtensionStats {
    pub extension: String,
    pub total_calls: usize,
    pub total_duration_secs: i64,
    pub answered: usize,
    pub missed: usize,
    /// Call-type counts, most frequent first.
    pub by_type: Vec<(String, usize)>,
    /// Call-result counts, most frequent first; blank results read "Unknown".
    pub by_result: Vec<(String, usize)>,
    pub by_hour: BTreeMap<u32, Bucket>,
    /// Monday-first; weekdays with no calls are omitted.
    pub by_day: Vec<(String, Bucket)>,
    pub by_date: BTreeMap<String, Bucket>,
}

impl ExtensionStats {
    pub fn average_duration_secs(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.total_duration_secs as f64 / self.total_calls as f64
        }
    }

    pub fn answer_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.answered as f64 / self.total_calls as f64 * 100.0
        }
    }
}

/// Split the export per agent extension, preserving row order within each.
pub fn partition(calls: &[CallRecord]) -> BTreeMap<String, Vec<&CallRecord>> {
    let mut by_extension: BTreeMap<String, Vec<&CallRecord>> = BTreeMap::new();
    for call in calls {
        by_extension
            .entry(call.extension.clone())
            .or_default()
            .push(call);
    }
    by_extension
}

pub fn compute(extension: &str, calls: &[&CallRecord]) -> ExtensionStats {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_result: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_hour: BTreeMap<u32, Bucket> = BTreeMap::new();
    let mut by_day: BTreeMap<&str, Bucket> = BTreeMap::new();
    let mut by_date: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut total_duration_secs = 0i64;

    for call in calls {
        total_duration_secs += call.duration_seconds;
        *by_type.entry(call.call_type.clone()).or_default() += 1;

        let result = if call.call_result.is_empty() {
            "Unknown".to_string()
        } else {
            call.call_result.clone()
        };
        *by_result.entry(result).or_default() += 1;

        if let Some(hour) = hour_of(&call.time) {
            by_hour.entry(hour).or_default().add(call.duration_seconds);
        }
        if let Some(day) = DAY_ORDER.iter().copied().find(|d| *d == call.day_of_week) {
            by_day.entry(day).or_default().add(call.duration_seconds);
        }
        if !call.date.is_empty() {
            by_date
                .entry(call.date.clone())
                .or_default()
                .add(call.duration_seconds);
        }
    }

    let answered = by_result.get("Answered").copied().unwrap_or(0);
    let missed = by_result.get("Missed").copied().unwrap_or(0)
        + by_result.get("No Answer").copied().unwrap_or(0);

    let mut by_type: Vec<(String, usize)> = by_type.into_iter().collect();
    by_type.sort_by(|a, b| b.1.cmp(&a.1));
    let mut by_result: Vec<(String, usize)> = by_result.into_iter().collect();
    by_result.sort_by(|a, b| b.1.cmp(&a.1));

    ExtensionStats {
        extension: extension.to_string(),
        total_calls: calls.len(),
        total_duration_secs,
        answered,
        missed,
        by_type,
        by_result,
        by_hour,
        by_day: DAY_ORDER
            .iter()
            .filter_map(|d| by_day.get(d).map(|b| (d.to_string(), *b)))
            .collect(),
        by_date,
    }
}

/// Cross-agent comparison row.
#[derive(Debug, Clone)]
pub struct AgentSummary {
    pub extension: String,
    pub calls: usize,
    pub duration_secs: i64,
    pub answered: usize,
}

impl AgentSummary {
    pub fn average_secs(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.duration_secs as f64 / self.calls as f64
        }
    }

    pub fn answer_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.answered as f64 / self.calls as f64 * 100.0
        }
    }
}

/// One summary per extension, busiest first.
pub fn summarize_agents(by_extension: &BTreeMap<String, Vec<&CallRecord>>) -> Vec<AgentSummary> {
    let mut summaries: Vec<AgentSummary> = by_extension
        .iter()
        .map(|(extension, calls)| AgentSummary {
            extension: extension.clone(),
            calls: calls.len(),
            duration_secs: calls.iter().map(|c| c.duration_seconds).sum(),
            answered: calls.iter().filter(|c| c.call_result == "Answered").count(),
        })
        .collect();
    summaries.sort_by(|a, b| b.calls.cmp(&a.calls));
    summaries
}

/// 1-based rank of `extension` when agents are ordered descending by `key`.
pub fn rank_of<F>(summaries: &[AgentSummary], extension: &str, key: F) -> Option<usize>
where
    F: Fn(&AgentSummary) -> f64,
{
    let mut ranked: Vec<&AgentSummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
        .iter()
        .position(|s| s.extension == extension)
        .map(|p| p + 1)
}

/// A gap between the end of one call and the start of the next on the same
/// day. Negative and zero gaps (overlapping records) are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct IdlePeriod {
    pub idle_secs: i64,
    pub end_of_call: NaiveDateTime,
    pub start_of_next: NaiveDateTime,
}

pub fn idle_periods(calls: &[&CallRecord]) -> Vec<IdlePeriod> {
    let mut timed: Vec<&CallRecord> = calls
        .iter()
        .copied()
        .filter(|c| c.timestamp.is_some())
        .collect();
    timed.sort_by_key(|c| c.timestamp);

    let mut periods = Vec::new();
    for pair in timed.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.date != next.date {
            continue;
        }
        let end_of_call =
            current.timestamp.unwrap() + Duration::seconds(current.duration_seconds);
        let start_of_next = next.timestamp.unwrap();
        let idle_secs = (start_of_next - end_of_call).num_seconds();
        if idle_secs > 0 {
            periods.push(IdlePeriod {
                idle_secs,
                end_of_call,
                start_of_next,
            });
        }
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn call(ext: &str, date: &str, time: &str, secs: i64, result: &str) -> CallRecord {
        CallRecord {
            extension: ext.to_string(),
            call_type: "Outbound".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            day_of_week: "Thursday".to_string(),
            duration_seconds: secs,
            call_result: result.to_string(),
            timestamp: NaiveDateTime::parse_from_str(
                &format!("{date} {time}"),
                "%d %b %Y %H:%M:%S",
            )
            .ok(),
        }
    }

    #[test]
    fn partition_groups_by_extension() {
        let calls = vec![
            call("1001", "08 Jan 2026", "09:00:00", 60, "Answered"),
            call("1002", "08 Jan 2026", "09:05:00", 30, "Answered"),
            call("1001", "08 Jan 2026", "10:00:00", 90, "Missed"),
        ];
        let by_ext = partition(&calls);
        assert_eq!(by_ext.len(), 2);
        assert_eq!(by_ext["1001"].len(), 2);
    }

    #[test]
    fn compute_totals_and_rates() {
        let calls = vec![
            call("1001", "08 Jan 2026", "09:00:00", 60, "Answered"),
            call("1001", "08 Jan 2026", "10:30:00", 120, "Missed"),
            call("1001", "08 Jan 2026", "10:45:00", 0, "No Answer"),
            call("1001", "09 Jan 2026", "09:15:00", 60, "Answered"),
        ];
        let refs: Vec<&CallRecord> = calls.iter().collect();
        let stats = compute("1001", &refs);

        assert_eq!(stats.total_calls, 4);
        assert_eq!(stats.total_duration_secs, 240);
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.missed, 2);
        assert_eq!(stats.average_duration_secs(), 60.0);
        assert_eq!(stats.answer_rate(), 50.0);

        // Two calls in the 10 o'clock bucket, one in each 9 o'clock.
        assert_eq!(stats.by_hour[&10].calls, 2);
        assert_eq!(stats.by_hour[&9].calls, 2);
        assert_eq!(stats.by_date.len(), 2);
    }

    #[test]
    fn day_breakdown_is_monday_first() {
        let mut monday = call("1001", "05 Jan 2026", "09:00:00", 10, "Answered");
        monday.day_of_week = "Monday".to_string();
        let mut friday = call("1001", "09 Jan 2026", "09:00:00", 10, "Answered");
        friday.day_of_week = "Friday".to_string();

        let calls = vec![friday, monday];
        let refs: Vec<&CallRecord> = calls.iter().collect();
        let stats = compute("1001", &refs);

        let days: Vec<&str> = stats.by_day.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Friday"]);
    }

    #[test]
    fn summaries_are_sorted_busiest_first() {
        let calls = vec![
            call("1001", "08 Jan 2026", "09:00:00", 60, "Answered"),
            call("1002", "08 Jan 2026", "09:05:00", 30, "Answered"),
            call("1002", "08 Jan 2026", "09:10:00", 30, "Missed"),
        ];
        let by_ext = partition(&calls);
        let summaries = summarize_agents(&by_ext);
        assert_eq!(summaries[0].extension, "1002");
        assert_eq!(summaries[0].calls, 2);
        assert_eq!(summaries[1].extension, "1001");
    }

    #[test]
    fn rank_orders_descending() {
        let calls = vec![
            call("1001", "08 Jan 2026", "09:00:00", 600, "Answered"),
            call("1002", "08 Jan 2026", "09:05:00", 30, "Answered"),
        ];
        let by_ext = partition(&calls);
        let summaries = summarize_agents(&by_ext);

        assert_eq!(
            rank_of(&summaries, "1001", |s| s.duration_secs as f64),
            Some(1)
        );
        assert_eq!(
            rank_of(&summaries, "1002", |s| s.duration_secs as f64),
            Some(2)
        );
        assert_eq!(rank_of(&summaries, "9999", |s| s.calls as f64), None);
    }

    #[test]
    fn idle_periods_same_day_positive_only() {
        let calls = vec![
            // Ends 09:01:00; next starts 09:11:00 → 600s idle.
            call("1001", "08 Jan 2026", "09:00:00", 60, "Answered"),
            call("1001", "08 Jan 2026", "09:11:00", 60, "Answered"),
            // Overlapping: next call starts before this one ends.
            call("1001", "08 Jan 2026", "09:11:30", 60, "Answered"),
            // Different day: no gap recorded across midnight.
            call("1001", "09 Jan 2026", "09:00:00", 60, "Answered"),
        ];
        let refs: Vec<&CallRecord> = calls.iter().collect();
        let periods = idle_periods(&refs);

        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].idle_secs, 600);
    }

    #[test]
    fn idle_periods_sorts_by_time_first() {
        let calls = vec![
            call("1001", "08 Jan 2026", "09:11:00", 60, "Answered"),
            call("1001", "08 Jan 2026", "09:00:00", 60, "Answered"),
        ];
        let refs: Vec<&CallRecord> = calls.iter().collect();
        let periods = idle_periods(&refs);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].idle_secs, 600);
    }
}
