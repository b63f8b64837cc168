//! Event, holiday and weekend configuration

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Largest buffer allowed around a weekend or holiday
pub const MAX_BUFFER_HOURS: i64 = 24;

/// Clamp a buffer into `[-24h, 24h]`
pub fn clamp_buffer(buffer: TimeDelta) -> TimeDelta {
    let max = TimeDelta::hours(MAX_BUFFER_HOURS);
    buffer.clamp(-max, max)
}

/// A named interval `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Event {
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Validated bounds, or the reason the event must be skipped
    pub fn bounds(&self) -> std::result::Result<(DateTime<Utc>, DateTime<Utc>), String> {
        if self.name.is_empty() {
            return Err("event name is empty".to_string());
        }
        let start = self.start.ok_or_else(|| "event start is not set".to_string())?;
        let end = self.end.ok_or_else(|| "event end is not set".to_string())?;
        if start > end {
            return Err(format!("event start {start} is after end {end}"));
        }
        Ok((start, end))
    }
}

/// Recurring holidays resolved through a [`crate::holidays::HolidayResolver`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayOptions {
    /// Holiday names understood by the resolver
    pub holidays: Vec<String>,
    /// Start marking this long before local midnight of the holiday
    #[serde(with = "super::duration")]
    pub dur_before: TimeDelta,
    /// Keep marking this long after the holiday's end
    #[serde(with = "super::duration")]
    pub dur_after: TimeDelta,
    /// IANA zone the holiday is observed in; the series' zone if unset
    pub timezone_override: Option<String>,
}

impl HolidayOptions {
    /// Builder method to add a holiday
    pub fn with_holiday(mut self, name: impl Into<String>) -> Self {
        self.holidays.push(name.into());
        self
    }

    /// Builder method to set the buffers around each holiday
    pub fn with_buffers(mut self, before: TimeDelta, after: TimeDelta) -> Self {
        self.dur_before = before;
        self.dur_after = after;
        self
    }

    /// Builder method to set the observing timezone
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone_override = Some(tz.into());
        self
    }
}

/// Configuration for event features
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventOptions {
    pub events: Vec<Event>,
    pub holidays: HolidayOptions,
}

/// Configuration for the weekend mask
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekendOptions {
    pub enabled: bool,
    /// IANA zone whose calendar defines the weekend; the series' zone if unset
    pub timezone_override: Option<String>,
    /// Positive widens the weekend before Saturday 00:00, negative narrows it
    #[serde(with = "super::duration")]
    pub dur_before: TimeDelta,
    /// Positive widens the weekend after Monday 00:00, negative narrows it
    #[serde(with = "super::duration")]
    pub dur_after: TimeDelta,
}

impl WeekendOptions {
    /// Enabled weekend mask with no buffers
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Builder method to set buffers
    pub fn with_buffers(mut self, before: TimeDelta, after: TimeDelta) -> Self {
        self.dur_before = before;
        self.dur_after = after;
        self
    }

    /// Builder method to set the weekend timezone
    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone_override = Some(tz.into());
        self
    }
}
