use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Decodes a stored priority. Values outside 0..=2 fall back to `Low`.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Medium,
            2 => Self::High,
            _ => Self::Low,
        }
    }

    pub const fn as_raw(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "0" => Some(Self::Low),
            "medium" | "1" => Some(Self::Medium),
            "high" | "2" => Some(Self::High),
            _ => None,
        }
    }
}

/// One to-do item. `id` is `None` until the record has been persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Todo {
    pub id: Option<TodoId>,
    pub name: String,
    pub priority: Priority,
    /// Milliseconds since the Unix epoch.
    pub deadline: i64,
    pub description: String,
    pub is_completed: bool,
}

impl Todo {
    /// A fresh transient record, as handed to the add dialog.
    pub fn draft(now_ms: i64) -> Self {
        Self {
            id: None,
            name: String::new(),
            priority: Priority::Low,
            deadline: now_ms,
            description: String::new(),
            is_completed: false,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }

    pub fn deadline_date(&self) -> NaiveDate {
        deadline_to_local_date(self.deadline)
    }

    pub fn formatted_deadline(&self) -> String {
        format_deadline(self.deadline)
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn deadline_to_local_date(deadline_ms: i64) -> NaiveDate {
    local_datetime(deadline_ms).date_naive()
}

pub fn format_deadline(deadline_ms: i64) -> String {
    deadline_to_local_date(deadline_ms)
        .format("%Y-%m-%d")
        .to_string()
}

/// Moves `deadline_ms` to `date`, keeping its local time of day.
pub fn with_date(deadline_ms: i64, date: NaiveDate) -> i64 {
    let time = local_datetime(deadline_ms).time();
    local_millis(date, time)
}

/// Local midnight of `date`, used when a deadline comes from a bare date.
pub fn start_of_day_millis(date: NaiveDate) -> i64 {
    local_millis(date, NaiveTime::MIN)
}

fn local_datetime(deadline_ms: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(deadline_ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&Local)
}

fn local_millis(date: NaiveDate, time: NaiveTime) -> i64 {
    let naive = date.and_time(time);
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(value) => value.timestamp_millis(),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        // Skipped by a DST gap; fall back to reading the wall time as UTC.
        chrono::LocalResult::None => naive.and_utc().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_decoding_is_total() {
        assert_eq!(Priority::from_raw(0), Priority::Low);
        assert_eq!(Priority::from_raw(1), Priority::Medium);
        assert_eq!(Priority::from_raw(2), Priority::High);
        assert_eq!(Priority::from_raw(7), Priority::Low);
        assert_eq!(Priority::from_raw(-1), Priority::Low);
        assert_eq!(Priority::from_raw(7).label(), "LOW");
    }

    #[test]
    fn priority_cycle_wraps() {
        assert_eq!(Priority::High.next(), Priority::Low);
        assert_eq!(Priority::Low.previous(), Priority::High);
        assert_eq!(Priority::parse("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn draft_is_transient_with_defaults() {
        let todo = Todo::draft(1_700_000_000_000);
        assert!(todo.is_transient());
        assert_eq!(todo.priority, Priority::Low);
        assert_eq!(todo.deadline, 1_700_000_000_000);
        assert!(!todo.is_completed);
    }

    #[test]
    fn with_date_keeps_time_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let original = local_millis(date, NaiveTime::from_hms_opt(14, 30, 0).expect("valid time"));
        let target = NaiveDate::from_ymd_opt(2025, 3, 20).expect("valid date");

        let moved = with_date(original, target);

        assert_eq!(deadline_to_local_date(moved), target);
        assert_eq!(local_datetime(moved).time(), local_datetime(original).time());
    }

    #[test]
    fn format_deadline_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).expect("valid date");
        assert_eq!(format_deadline(start_of_day_millis(date)), "2024-12-01");
    }
}
