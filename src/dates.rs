//! Due date parsing and relative formatting.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" (midnight UTC)
/// - full RFC 3339 timestamps
pub fn parse_due_input(s: &str) -> Option<DateTime<Utc>> {
    parse_due_input_at(s, Utc::now())
}

/// Same as [`parse_due_input`] with an explicit "now" for relative words.
pub fn parse_due_input_at(s: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let s = raw.to_lowercase();
    let today = now.date_naive();

    let day = match s.as_str() {
        "today" => Some(today),
        "tomorrow" => Some(today + Duration::days(1)),
        "yesterday" => Some(today - Duration::days(1)),
        _ => None,
    };
    if let Some(d) = day {
        return Some(midnight_utc(d));
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(midnight_utc(today + Duration::days(days)));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(midnight_utc(today + Duration::weeks(weeks)));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok().map(midnight_utc)
}

fn midnight_utc(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = d.date_naive() - today;
            if delta.num_days() == 0 {
                "today".into()
            } else if delta.num_days() == 1 {
                "tomorrow".into()
            } else if delta.num_days() > 1 {
                format!("in {}d", delta.num_days())
            } else {
                format!("{}d late", -delta.num_days())
            }
        }
    }
}
