//! Event, holiday and weekend masks

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::feature::{Feature, FeatureSet};
use crate::holidays::{snake_name, HolidayResolver};
use crate::options::{clamp_buffer, EventOptions, HolidayOptions, WeekendOptions};
use crate::timeseries::TimeSeries;
use crate::window::{series_mask, WindowFunction};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// Event name of the weekend mask
pub const WEEKEND_EVENT: &str = "weekend";

/// Resolve an optional IANA zone override, degrading to `native`
pub fn resolve_zone(name: Option<&str>, native: Tz, subject: &str, diagnostics: &mut Diagnostics) -> Tz {
    match name {
        None | Some("") => native,
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            diagnostics.warn(
                subject,
                format!("unknown timezone {name}, using {}", native.name()),
            );
            native
        }),
    }
}

/// UTC instant of local midnight on `date`, or the first valid local time
/// after it when midnight falls in a DST gap
pub fn local_midnight(zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..3)
        .find_map(|h| {
            zone.from_local_datetime(&(midnight + TimeDelta::hours(h)))
                .earliest()
        })
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Weekend membership with optional buffers
///
/// With zero buffers this is plain Saturday/Sunday membership in `zone`.
/// `before` shifts the start of the weekend earlier (positive) or later
/// (negative) and `after` shifts its end later or earlier. Both buffers are
/// clamped to +/-24h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekendPredicate {
    zone: Tz,
    before: TimeDelta,
    after: TimeDelta,
}

impl WeekendPredicate {
    pub fn new(zone: Tz, before: TimeDelta, after: TimeDelta) -> Self {
        Self {
            zone,
            before: clamp_buffer(before),
            after: clamp_buffer(after),
        }
    }

    fn on_weekend(&self, t: DateTime<Utc>) -> bool {
        matches!(
            t.with_timezone(&self.zone).weekday(),
            Weekday::Sat | Weekday::Sun
        )
    }

    pub fn is_weekend(&self, t: &DateTime<Utc>) -> bool {
        let zero = TimeDelta::zero();
        if self.before == zero && self.after == zero {
            return self.on_weekend(*t);
        }

        let early = *t + self.before;
        let late = *t - self.after;
        if self.before > zero && self.after > zero {
            self.on_weekend(early) || self.on_weekend(late)
        } else if self.before <= zero && self.after <= zero {
            self.on_weekend(early) && self.on_weekend(late)
        } else {
            self.in_shifted_window(t)
        }
    }

    /// `t` in `[Sat 00:00 - before, Mon 00:00 + after)` in local time
    fn in_shifted_window(&self, t: &DateTime<Utc>) -> bool {
        let local = (*t + self.before).with_timezone(&self.zone);
        let days_since_saturday = (local.weekday().num_days_from_monday() + 2) % 7;
        let saturday = local.date_naive() - Days::new(u64::from(days_since_saturday));
        let monday = saturday + Days::new(2);
        *t < local_midnight(self.zone, monday) + self.after
    }

    /// Longest span the predicate can mark
    pub fn look_around(&self) -> TimeDelta {
        TimeDelta::hours(48) + self.before.max(TimeDelta::zero()) + self.after.max(TimeDelta::zero())
    }
}

/// Mask of the weekend, keyed `event_weekend`
pub fn weekend_features(
    series: &TimeSeries,
    options: &WeekendOptions,
    window: WindowFunction,
    diagnostics: &mut Diagnostics,
) -> Result<FeatureSet> {
    let mut set = FeatureSet::new();
    if !options.enabled {
        return Ok(set);
    }
    let zone = resolve_zone(
        options.timezone_override.as_deref(),
        series.zone(),
        "weekend",
        diagnostics,
    );
    let predicate = WeekendPredicate::new(zone, options.dur_before, options.dur_after);
    let mask = series_mask(
        series,
        |t| predicate.is_weekend(t),
        window,
        predicate.look_around(),
    )?;
    set.set(Feature::event(WEEKEND_EVENT), mask);
    Ok(set)
}

/// Masks of every valid explicit event; invalid events and repeated names
/// are skipped
pub fn standard_event_features(
    series: &TimeSeries,
    options: &EventOptions,
    window: WindowFunction,
    diagnostics: &mut Diagnostics,
) -> Result<FeatureSet> {
    let mut set = FeatureSet::new();
    for event in &options.events {
        let (start, end) = match event.bounds() {
            Ok(bounds) => bounds,
            Err(reason) => {
                diagnostics.warn(format!("event:{}", event.name), reason);
                continue;
            }
        };
        let feature = Feature::event(event.name.clone());
        if set.contains(&feature) {
            diagnostics.warn(
                format!("event:{}", event.name),
                "event name already used, keeping the first event",
            );
            continue;
        }
        let mask = series_mask(series, |t| *t >= start && *t < end, window, end - start)?;
        set.set(feature, mask);
    }
    Ok(set)
}

/// Observed spans of one holiday for every year the series touches
pub fn holiday_spans(
    resolver: &dyn HolidayResolver,
    holiday: &str,
    years: std::ops::RangeInclusive<i32>,
    zone: Tz,
    before: TimeDelta,
    after: TimeDelta,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    years
        .filter_map(|year| resolver.observed(holiday, year))
        .filter_map(|date| {
            let next = date.succ_opt()?;
            Some((
                local_midnight(zone, date) - before,
                local_midnight(zone, next) + after,
            ))
        })
        .collect()
}

/// Recurring masks of the configured holidays, keyed by snake-cased name
pub fn holiday_features(
    series: &TimeSeries,
    options: &HolidayOptions,
    resolver: Option<&dyn HolidayResolver>,
    window: WindowFunction,
    diagnostics: &mut Diagnostics,
) -> Result<FeatureSet> {
    let mut set = FeatureSet::new();
    if options.holidays.is_empty() {
        return Ok(set);
    }
    let resolver = match resolver {
        Some(resolver) => resolver,
        None => {
            diagnostics.warn("holidays", "no holiday resolver configured, skipping holidays");
            return Ok(set);
        }
    };
    let (min, max) = match (series.min(), series.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => return Ok(set),
    };

    let zone = resolve_zone(
        options.timezone_override.as_deref(),
        series.zone(),
        "holidays",
        diagnostics,
    );
    let before = clamp_buffer(options.dur_before);
    let after = clamp_buffer(options.dur_after);
    let years = (min.with_timezone(&zone).year() - 1)..=(max.with_timezone(&zone).year() + 1);

    for holiday in &options.holidays {
        let name = snake_name(holiday);
        if name.is_empty() {
            diagnostics.warn(format!("holiday:{holiday}"), "holiday name is empty");
            continue;
        }
        if set.contains(&Feature::event(name.clone())) {
            diagnostics.warn(
                format!("event:{name}"),
                format!("holiday {holiday} repeats an earlier holiday, skipping"),
            );
            continue;
        }
        let spans = holiday_spans(resolver, holiday, years.clone(), zone, before, after);
        if spans.is_empty() {
            diagnostics.warn(
                format!("holiday:{holiday}"),
                "resolver returned no observed dates, skipping",
            );
            continue;
        }
        let look_around = spans
            .iter()
            .map(|(start, end)| *end - *start)
            .max()
            .unwrap_or_else(TimeDelta::zero);
        let mask = series_mask(
            series,
            |t| spans.iter().any(|(start, end)| t >= start && t < end),
            window,
            look_around,
        )?;
        set.set(Feature::event(name), mask);
    }
    Ok(set)
}
