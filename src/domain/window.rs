//! Review instance time window
//!
//! Instances are exported only when their whole review period lies inside the
//! requested window: `startDateTime >= window.start` and
//! `endDateTime <= window.end`, both bounds inclusive.

use crate::domain::{ArxError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// Outcome of checking an instance record against the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Instance period lies inside the window
    Inside,
    /// Instance period starts before or ends after the window
    Outside,
    /// Instance has no parseable start or end timestamp
    Undated,
}

/// Inclusive UTC window used to select review instances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl InstanceWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(ArxError::Validation(format!(
                "Window start {} is after window end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two user-supplied bounds
    ///
    /// Each bound is an RFC 3339 timestamp or a `YYYY-MM-DD` date. A bare start
    /// date means midnight; a bare end date means the last millisecond of that day.
    ///
    /// # Examples
    ///
    /// ```
    /// use arx::domain::window::InstanceWindow;
    ///
    /// let window = InstanceWindow::parse("2024-01-01", "2024-03-31T23:59:59Z").unwrap();
    /// assert_eq!(window.start().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_bound(start, false)?;
        let end = parse_bound(end, true)?;
        Self::new(start, end)
    }

    /// Window start (inclusive)
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Window end (inclusive)
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether a review period lies inside the window
    pub fn contains(&self, period_start: DateTime<Utc>, period_end: DateTime<Utc>) -> bool {
        period_start >= self.start && period_end <= self.end
    }

    /// Check a raw instance record using its `startDateTime` and `endDateTime` fields
    pub fn classify(&self, instance: &Value) -> WindowDecision {
        let start = instance
            .get("startDateTime")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);
        let end = instance
            .get("endDateTime")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);

        match (start, end) {
            (Some(s), Some(e)) if self.contains(s, e) => WindowDecision::Inside,
            (Some(_), Some(_)) => WindowDecision::Outside,
            _ => WindowDecision::Undated,
        }
    }
}

impl fmt::Display for InstanceWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Some(ts) = parse_timestamp(value) {
        return Ok(ts);
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ArxError::Validation(format!(
            "Invalid window bound '{value}'. Expected RFC 3339 timestamp or YYYY-MM-DD"
        ))
    })?;

    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| ArxError::Other("Invalid time of day".to_string()))?;

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn window() -> InstanceWindow {
        InstanceWindow::parse("2024-01-01T00:00:00Z", "2024-06-30T23:59:59Z").unwrap()
    }

    #[test]
    fn test_parse_rfc3339_bounds() {
        let w = window();
        assert_eq!(w.start().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(w.end().to_rfc3339(), "2024-06-30T23:59:59+00:00");
    }

    #[test]
    fn test_parse_date_bounds_cover_whole_end_day() {
        let w = InstanceWindow::parse("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(w.start().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(w.end().to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
    }

    #[test]
    fn test_parse_offset_is_normalized_to_utc() {
        let w = InstanceWindow::parse("2024-01-01T02:00:00+02:00", "2024-01-02").unwrap();
        assert_eq!(w.start().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(InstanceWindow::parse("yesterday", "2024-01-01").is_err());
        assert!(InstanceWindow::parse("2024-01-01", "01/02/2024").is_err());
    }

    #[test]
    fn test_start_after_end_rejected() {
        let result = InstanceWindow::parse("2024-02-01", "2024-01-01");
        assert!(matches!(result, Err(ArxError::Validation(_))));
    }

    #[test]
    fn test_classify_inside() {
        let instance = json!({
            "id": "i1",
            "startDateTime": "2024-02-01T00:00:00Z",
            "endDateTime": "2024-02-15T00:00:00Z"
        });
        assert_eq!(window().classify(&instance), WindowDecision::Inside);
    }

    #[test]
    fn test_classify_bounds_are_inclusive() {
        let instance = json!({
            "startDateTime": "2024-01-01T00:00:00Z",
            "endDateTime": "2024-06-30T23:59:59Z"
        });
        assert_eq!(window().classify(&instance), WindowDecision::Inside);
    }

    #[test]
    fn test_classify_outside() {
        let early = json!({
            "startDateTime": "2023-12-31T23:59:59Z",
            "endDateTime": "2024-01-10T00:00:00Z"
        });
        let late = json!({
            "startDateTime": "2024-06-01T00:00:00Z",
            "endDateTime": "2024-07-01T00:00:00Z"
        });
        assert_eq!(window().classify(&early), WindowDecision::Outside);
        assert_eq!(window().classify(&late), WindowDecision::Outside);
    }

    #[test]
    fn test_classify_fractional_seconds() {
        let instance = json!({
            "startDateTime": "2024-03-01T08:00:00.000Z",
            "endDateTime": "2024-03-15T08:00:00.123Z"
        });
        assert_eq!(window().classify(&instance), WindowDecision::Inside);
    }

    #[test]
    fn test_classify_undated() {
        let missing = json!({"startDateTime": "2024-03-01T08:00:00Z"});
        let garbage = json!({"startDateTime": "soon", "endDateTime": "later"});
        assert_eq!(window().classify(&missing), WindowDecision::Undated);
        assert_eq!(window().classify(&garbage), WindowDecision::Undated);
    }
}
