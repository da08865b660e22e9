//! Event records and query range types.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::interval::DateInterval;

/// Busy block as returned by the `/findtime` endpoint.
///
/// `start` and `end` are Unix timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start: i64,
    pub end: i64,
    /// Display colour assigned per scheduling link by the server.
    #[serde(default)]
    pub color: String,
}

impl Event {
    pub fn new(title: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            color: String::new(),
        }
    }
}

/// Fold overlapping or touching events into single busy blocks.
///
/// Events are sorted by `(start, end)`; a merged block keeps the title and
/// colour of its earliest event.
pub fn merge_overlapping(events: &mut Vec<Event>) {
    events.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));

    let mut merged: Vec<Event> = Vec::with_capacity(events.len());
    for event in std::mem::take(events) {
        match merged.last_mut() {
            Some(last) if last.end >= event.start => {
                last.end = last.end.max(event.end);
            }
            _ => merged.push(event),
        }
    }

    *events = merged;
}

/// Date range requested by the calendar view.
///
/// The bounds are kept as the view produced them; see
/// [`RangeInfo::wire_bounds`] for what is sent to the event endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeInfo {
    pub start_str: String,
    pub end_str: String,
}

impl RangeInfo {
    pub fn new(start_str: impl Into<String>, end_str: impl Into<String>) -> Self {
        Self {
            start_str: start_str.into(),
            end_str: end_str.into(),
        }
    }

    /// Parse both bounds into an ordered UTC interval.
    ///
    /// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn parse(&self) -> Result<DateInterval<DateTime<Utc>>, CalendarError> {
        let start = parse_bound(&self.start_str)?;
        let end = parse_bound(&self.end_str)?;
        DateInterval::new(start, end).ok_or_else(|| {
            CalendarError::InvalidRange(format!(
                "start {} is after end {}",
                self.start_str, self.end_str
            ))
        })
    }

    /// Bounds as sent to the event endpoint, which only accepts RFC 3339.
    ///
    /// RFC 3339 bounds are forwarded verbatim; bare dates become midnight
    /// UTC (`YYYY-MM-DDT00:00:00Z`).
    pub fn wire_bounds(&self) -> Result<(String, String), CalendarError> {
        Ok((wire_bound(&self.start_str)?, wire_bound(&self.end_str)?))
    }
}

fn wire_bound(value: &str) -> Result<String, CalendarError> {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return Ok(value.to_string());
    }
    parse_bound(value).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn parse_bound(value: &str) -> Result<DateTime<Utc>, CalendarError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CalendarError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_event_deserializes_without_color() {
        let event: Event =
            serde_json::from_str(r#"{"title":"Busy","start":100,"end":200}"#).unwrap();
        assert_eq!(event, Event::new("Busy", 100, 200));
    }

    #[test]
    fn test_merge_overlapping_blocks() {
        let mut events = vec![
            Event::new("c", 50, 60),
            Event::new("a", 10, 20),
            Event::new("b", 15, 30),
            Event::new("d", 30, 40),
        ];
        merge_overlapping(&mut events);

        assert_eq!(events.len(), 2);
        assert_eq!((events[0].start, events[0].end), (10, 40));
        assert_eq!(events[0].title, "a");
        assert_eq!((events[1].start, events[1].end), (50, 60));
    }

    #[test]
    fn test_merge_overlapping_empty() {
        let mut events = Vec::new();
        merge_overlapping(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_rfc3339_range() {
        let info = RangeInfo::new("2024-02-01T00:00:00-05:00", "2024-02-08T00:00:00Z");
        let range = info.parse().unwrap();

        assert_eq!(range.start.to_rfc3339(), "2024-02-01T05:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2024-02-08T00:00:00+00:00");
    }

    #[test]
    fn test_parse_bare_dates() {
        let range = RangeInfo::new("2024-02-01", "2024-02-08").parse().unwrap();
        assert!(range.start < range.end);
    }

    #[test]
    fn test_wire_bounds_keep_rfc3339_verbatim() {
        let info = RangeInfo::new("2024-02-01T00:00:00-05:00", "2024-02-08T00:00:00Z");
        let (start, end) = info.wire_bounds().unwrap();

        assert_eq!(start, "2024-02-01T00:00:00-05:00");
        assert_eq!(end, "2024-02-08T00:00:00Z");
    }

    #[test]
    fn test_wire_bounds_expand_bare_dates() {
        let (start, end) = RangeInfo::new("2024-02-01", "2024-02-08").wire_bounds().unwrap();

        assert_eq!(start, "2024-02-01T00:00:00Z");
        assert_eq!(end, "2024-02-08T00:00:00Z");
        assert!(DateTime::parse_from_rfc3339(&start).is_ok());
    }

    #[test]
    fn test_wire_bounds_reject_garbage() {
        let result = RangeInfo::new("2024-02-01", "friday").wire_bounds();
        assert!(matches!(result, Err(CalendarError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_invalid_date() {
        let result = RangeInfo::new("next tuesday", "2024-02-08").parse();
        assert!(matches!(result, Err(CalendarError::InvalidDate(d)) if d == "next tuesday"));
    }

    #[test]
    fn test_parse_inverted_range() {
        let result = RangeInfo::new("2024-02-08", "2024-02-01").parse();
        assert!(matches!(result, Err(CalendarError::InvalidRange(_))));
    }
}
