//! Holiday date resolution
//!
//! Holiday calendars are not bundled. Callers inject a [`HolidayResolver`]
//! that maps a holiday name and year to the date it is observed on; the
//! builder turns those dates into recurring event masks.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

/// Resolves the observed date of a named holiday in a given year
pub trait HolidayResolver: Send + Sync {
    /// `None` when the holiday is unknown or not observed that year
    fn observed(&self, holiday: &str, year: i32) -> Option<NaiveDate>;
}

impl<F> HolidayResolver for F
where
    F: Fn(&str, i32) -> Option<NaiveDate> + Send + Sync,
{
    fn observed(&self, holiday: &str, year: i32) -> Option<NaiveDate> {
        self(holiday, year)
    }
}

/// Resolver for holidays that fall on the same month and day every year
#[derive(Debug, Clone, Default)]
pub struct FixedDateHolidays {
    dates: HashMap<String, (u32, u32)>,
    weekend_observance: bool,
}

impl FixedDateHolidays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a holiday on `month`/`day`
    pub fn with_holiday(mut self, name: impl Into<String>, month: u32, day: u32) -> Self {
        self.dates.insert(name.into(), (month, day));
        self
    }

    /// Observe Saturday holidays on the Friday before and Sunday holidays
    /// on the Monday after
    pub fn with_weekend_observance(mut self) -> Self {
        self.weekend_observance = true;
        self
    }
}

impl HolidayResolver for FixedDateHolidays {
    fn observed(&self, holiday: &str, year: i32) -> Option<NaiveDate> {
        let &(month, day) = self.dates.get(holiday)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        if !self.weekend_observance {
            return Some(date);
        }
        match date.weekday() {
            Weekday::Sat => date.pred_opt(),
            Weekday::Sun => date.succ_opt(),
            _ => Some(date),
        }
    }
}

/// Feature-safe name for a holiday: lowercase ascii alphanumerics joined by `_`
pub fn snake_name(holiday: &str) -> String {
    let mut out = String::with_capacity(holiday.len());
    for c in holiday.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_date_resolver() {
        let resolver = FixedDateHolidays::new().with_holiday("Christmas Day", 12, 25);
        assert_eq!(
            resolver.observed("Christmas Day", 2024),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
        assert_eq!(resolver.observed("Boxing Day", 2024), None);
    }

    #[test]
    fn test_weekend_observance() {
        let resolver = FixedDateHolidays::new()
            .with_holiday("Independence Day", 7, 4)
            .with_weekend_observance();
        // 2026-07-04 is a Saturday
        assert_eq!(
            resolver.observed("Independence Day", 2026),
            NaiveDate::from_ymd_opt(2026, 7, 3)
        );
        // 2021-07-04 is a Sunday
        assert_eq!(
            resolver.observed("Independence Day", 2021),
            NaiveDate::from_ymd_opt(2021, 7, 5)
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |name: &str, year: i32| {
            (name == "leap").then(|| NaiveDate::from_ymd_opt(year, 2, 29)).flatten()
        };
        assert!(resolver.observed("leap", 2024).is_some());
        assert!(resolver.observed("leap", 2023).is_none());
    }

    #[test]
    fn test_snake_name() {
        assert_eq!(snake_name("New Year's Day"), "new_year_s_day");
        assert_eq!(snake_name("  Black Friday!! "), "black_friday");
        assert_eq!(snake_name("christmas"), "christmas");
    }
}
