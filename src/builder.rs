//! Design-matrix assembly
//!
//! [`FeatureBuilder`] runs every generator in order over one series:
//! DST correction, elapsed time, growth, changepoints, event masks,
//! seasonality and finally the masked seasonality interactions.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::feature::{ChangepointComponent, Feature, FeatureSet};
use crate::generate::{self, changepoint, HarmonicPlan, TIME_FEATURE_NAME, WEEKEND_EVENT};
use crate::holidays::HolidayResolver;
use crate::options::{Changepoint, ForecastOptions};
use crate::timeseries::{epoch_seconds, DstAdjuster, TimeSeries};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Output of one build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureBuild {
    pub features: FeatureSet,
    /// Non-fatal problems met while building
    pub diagnostics: Diagnostics,
    /// Changepoints that produced columns, with their feature names
    pub changepoints: Vec<Changepoint>,
}

/// Builds forecast features from a [`ForecastOptions`]
#[derive(Clone)]
pub struct FeatureBuilder {
    options: ForecastOptions,
    holidays: Option<Arc<dyn HolidayResolver>>,
}

impl fmt::Debug for FeatureBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureBuilder")
            .field("options", &self.options)
            .field("holidays", &self.holidays.is_some())
            .finish()
    }
}

impl FeatureBuilder {
    pub fn new(options: ForecastOptions) -> Self {
        Self {
            options,
            holidays: None,
        }
    }

    /// Builder method to set the resolver used for holiday events
    pub fn with_holiday_resolver(mut self, resolver: impl HolidayResolver + 'static) -> Self {
        self.holidays = Some(Arc::new(resolver));
        self
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Build with the series' own first and last timestamps as the
    /// training window
    pub fn build_training(&self, series: &TimeSeries) -> Result<FeatureBuild> {
        match (series.min(), series.max()) {
            (Some(start), Some(end)) => self.build(series, start, end),
            _ => Ok(FeatureBuild::default()),
        }
    }

    /// Build every feature for `series`.
    ///
    /// Growth is scaled and changepoints are placed relative to
    /// `[train_start, train_end]`, so the same window reproduces the
    /// training columns for forecast timestamps. Fails only when a tapered
    /// mask needs a frequency that cannot be inferred.
    pub fn build(
        &self,
        series: &TimeSeries,
        train_start: DateTime<Utc>,
        train_end: DateTime<Utc>,
    ) -> Result<FeatureBuild> {
        let started = Instant::now();
        let mut diagnostics = Diagnostics::new();
        if series.is_empty() {
            return Ok(FeatureBuild::default());
        }
        let options = &self.options;

        let adjuster = if options.dst.enabled {
            DstAdjuster::new(options.dst.timezones.as_slice(), series.zone(), &mut diagnostics)
        } else {
            DstAdjuster::default()
        };
        // tapered masks still pad in the uncorrected timeline
        let series = adjuster.adjust(series);
        let train_start = adjuster.adjust_timestamp(train_start);
        let train_end = adjuster.adjust_timestamp(train_end);

        let mut features = generate::time_features(&series);
        let time = features
            .get(&Feature::time(TIME_FEATURE_NAME))
            .map(<[f64]>::to_vec)
            .unwrap_or_else(|| series.epochs());

        let growth = generate::growth_features(
            &time,
            epoch_seconds(&train_start),
            epoch_seconds(&train_end),
            options.growth,
        );
        if growth.is_empty() {
            diagnostics.warn(
                "growth",
                "training window has zero length, intercept and growth omitted",
            );
        }
        features.update(growth);

        let changepoints = self.changepoints(train_start, train_end);
        let changepoint_set = generate::changepoint_features(
            &series,
            &changepoints,
            train_end,
            options.changepoints.enable_growth,
            &mut diagnostics,
        );

        let window = options.mask_window;
        let mut events =
            generate::standard_event_features(&series, &options.events, window, &mut diagnostics)?;
        let holidays = generate::holiday_features(
            &series,
            &options.events.holidays,
            self.holidays.as_deref(),
            window,
            &mut diagnostics,
        )?;
        merge_events(&mut events, holidays, "holiday", &mut diagnostics);
        let weekend =
            generate::weekend_features(&series, &options.weekend, window, &mut diagnostics)?;
        let weekend_event = Feature::event(WEEKEND_EVENT);
        if weekend.contains(&weekend_event) && events.remove(&weekend_event).is_some() {
            diagnostics.warn(
                format!("event:{WEEKEND_EVENT}"),
                "event name is taken by the weekend mask, skipping event",
            );
        }

        let plans = generate::plan_harmonics(&options.seasonality.configs, &mut diagnostics);
        let seasonality =
            generate::seasonality_features(&time, TIME_FEATURE_NAME, &plans, &options.parallel);

        let mut masked = FeatureSet::new();
        let masks = events.iter().chain(changepoint_set.iter().filter(|(feature, _)| {
            matches!(
                feature,
                Feature::Changepoint {
                    component: ChangepointComponent::Bias,
                    ..
                }
            )
        }));
        for (feature, mask) in masks {
            masked.update(generate::masked_seasonality(
                &seasonality,
                TIME_FEATURE_NAME,
                &plans,
                feature,
                Some(mask),
                &mut diagnostics,
            ));
        }
        if options.weekend.enabled {
            let daily: Vec<HarmonicPlan> =
                plans.iter().filter(|p| p.config.is_daily()).cloned().collect();
            masked.update(generate::masked_seasonality(
                &seasonality,
                TIME_FEATURE_NAME,
                &daily,
                &weekend_event,
                weekend.get(&weekend_event),
                &mut diagnostics,
            ));
        }

        let generated: Vec<Changepoint> = changepoints
            .into_iter()
            .enumerate()
            .map(|(index, cp)| Changepoint::new(changepoint::changepoint_name(&cp, index), cp.time))
            .filter(|cp| {
                changepoint_set.contains(&Feature::changepoint(cp.name.clone(), ChangepointComponent::Bias))
            })
            .collect();

        features.update(changepoint_set);
        features.update(events);
        features.update(weekend);
        features.update(seasonality);
        features.update(masked);

        tracing::debug!(
            rows = features.rows(),
            columns = features.len(),
            warnings = diagnostics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built forecast features"
        );

        Ok(FeatureBuild {
            features,
            diagnostics,
            changepoints: generated,
        })
    }

    fn changepoints(&self, train_start: DateTime<Utc>, train_end: DateTime<Utc>) -> Vec<Changepoint> {
        generate::resolve_changepoints(&self.options.changepoints, train_start, train_end)
    }
}

/// Add `incoming` masks to `events`, keeping the existing mask when a name
/// is already taken
fn merge_events(
    events: &mut FeatureSet,
    incoming: FeatureSet,
    source: &str,
    diagnostics: &mut Diagnostics,
) {
    for (feature, values) in incoming.iter() {
        if events.contains(feature) {
            let name = feature.get("name").unwrap_or_default();
            diagnostics.warn(
                format!("event:{name}"),
                format!("{source} shares its name with an explicit event, skipping {source}"),
            );
            continue;
        }
        events.set(feature.clone(), values.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureType, FourierComponent, GrowthComponent};
    use crate::options::{ChangepointOptions, Event, SeasonalityConfig, SeasonalityOptions, WeekendOptions};
    use crate::window::WindowFunction;
    use chrono::{TimeDelta, TimeZone};

    fn thursday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()
    }

    fn six_hourly(n: usize) -> TimeSeries {
        TimeSeries::from_range(thursday(), TimeDelta::hours(6), n)
    }

    #[test]
    fn test_default_build() {
        let builder = FeatureBuilder::new(ForecastOptions::default());
        let build = builder.build_training(&six_hourly(28)).unwrap();
        let features = &build.features;

        assert_eq!(features.rows(), 28);
        assert!(features.contains(&Feature::growth(GrowthComponent::Intercept)));
        assert!(features.contains(&Feature::growth(GrowthComponent::Linear)));
        assert_eq!(features.labels()[0], Feature::growth(GrowthComponent::Intercept));
        assert!(build.changepoints.is_empty());

        // 12 daily + 6 weekly harmonics, sin and cos each
        let base = features
            .filter_by_type(FeatureType::Seasonality)
            .features()
            .iter()
            .filter(|f| f.get("name").is_some_and(|n| n.starts_with("epoch_")))
            .count();
        assert_eq!(base, 36);
    }

    #[test]
    fn test_auto_changepoints_over_training_window() {
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty())
            .with_changepoints(ChangepointOptions::new().with_auto(4).with_growth());
        let series = six_hourly(28);
        let train_end = thursday() + TimeDelta::days(4);
        let build = FeatureBuilder::new(options)
            .build(&series, thursday(), train_end)
            .unwrap();

        let times: Vec<_> = build.changepoints.iter().map(|c| c.time).collect();
        assert_eq!(
            times,
            (0..4).map(|i| thursday() + TimeDelta::days(i)).collect::<Vec<_>>()
        );
        assert_eq!(build.features.filter_by_type(FeatureType::Changepoint).len(), 8);

        // growth keeps scaling past the training window
        let linear = build
            .features
            .get(&Feature::growth(GrowthComponent::Linear))
            .unwrap();
        assert_eq!(linear[0], 0.0);
        assert_eq!(linear[16], 1.0);
        assert!(linear[27] > 1.0);
    }

    #[test]
    fn test_empty_series() {
        let builder = FeatureBuilder::new(ForecastOptions::default());
        let build = builder.build_training(&TimeSeries::new(Vec::new())).unwrap();
        assert!(build.features.is_empty());
        assert!(build.diagnostics.is_empty());
    }

    #[test]
    fn test_weekend_interaction_is_daily_only() {
        let options = ForecastOptions::new()
            .with_changepoints(ChangepointOptions::new())
            .with_weekend(WeekendOptions::enabled());
        let build = FeatureBuilder::new(options).build_training(&six_hourly(28)).unwrap();
        let features = &build.features;

        let weekend_daily = Feature::seasonality("event_weekend_daily", 1, FourierComponent::Cos);
        let weekend_weekly = Feature::seasonality("event_weekend_weekly", 1, FourierComponent::Cos);
        assert!(features.contains(&weekend_daily));
        assert!(!features.contains(&weekend_weekly));

        let mask = features.get(&Feature::event(WEEKEND_EVENT)).unwrap();
        let base = features
            .get(&Feature::seasonality("epoch_daily", 1, FourierComponent::Cos))
            .unwrap();
        let masked = features.get(&weekend_daily).unwrap();
        for i in 0..28 {
            assert!((masked[i] - base[i] * mask[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_event_and_changepoint_interactions() {
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty().with_config(SeasonalityConfig::daily(1)))
            .with_changepoints(
                ChangepointOptions::new()
                    .with_changepoint(Changepoint::new("launch", thursday() + TimeDelta::days(2))),
            )
            .with_event(Event::new(
                "promo",
                thursday() + TimeDelta::days(1),
                thursday() + TimeDelta::days(3),
            ));
        let build = FeatureBuilder::new(options).build_training(&six_hourly(28)).unwrap();

        assert_eq!(build.changepoints.len(), 1);
        assert_eq!(build.changepoints[0].name, "launch");
        for name in ["event_promo_daily", "chpnt_launch_bias_daily"] {
            for component in [FourierComponent::Sin, FourierComponent::Cos] {
                assert!(build
                    .features
                    .contains(&Feature::seasonality(name, 1, component)));
            }
        }
    }

    #[test]
    fn test_event_named_like_time_feature_keeps_base_terms() {
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty().with_config(SeasonalityConfig::daily(1)))
            .with_changepoints(ChangepointOptions::new())
            .with_event(Event::new("epoch", thursday(), thursday() + TimeDelta::hours(6)));
        let series = six_hourly(6);
        let build = FeatureBuilder::new(options).build_training(&series).unwrap();

        let base = build
            .features
            .get(&Feature::seasonality("epoch_daily", 1, FourierComponent::Cos))
            .unwrap();
        let omega = 2.0 * std::f64::consts::PI / 86_400.0;
        for (value, t) in base.iter().zip(series.epochs()) {
            assert!((value - (omega * t).cos()).abs() < 1e-9);
        }
        let masked = build
            .features
            .get(&Feature::seasonality("event_epoch_daily", 1, FourierComponent::Cos))
            .unwrap();
        assert!((masked[0] - 1.0).abs() < 1e-9);
        assert!(masked[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_event_named_weekend_is_skipped() {
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty())
            .with_changepoints(ChangepointOptions::new())
            .with_weekend(WeekendOptions::enabled())
            .with_event(Event::new("weekend", thursday(), thursday() + TimeDelta::hours(6)));
        let build = FeatureBuilder::new(options).build_training(&six_hourly(28)).unwrap();

        assert!(build.diagnostics.mentions("event:weekend"));
        let mask = build.features.get(&Feature::event(WEEKEND_EVENT)).unwrap();
        assert_eq!(mask[0], 0.0);
        assert_eq!(mask[8], 1.0);
    }

    #[test]
    fn test_holiday_sharing_event_name_is_skipped() {
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty())
            .with_changepoints(ChangepointOptions::new())
            .with_event(Event::new("new_year", thursday(), thursday() + TimeDelta::hours(6)))
            .with_holidays(crate::options::HolidayOptions::default().with_holiday("New Year"));
        let build = FeatureBuilder::new(options)
            .with_holiday_resolver(crate::holidays::FixedDateHolidays::new().with_holiday("New Year", 1, 5))
            .build_training(&six_hourly(12))
            .unwrap();

        assert!(build.diagnostics.mentions("event:new_year"));
        let mask = build.features.get(&Feature::event("new_year")).unwrap();
        assert_eq!(mask[0], 1.0);
        assert!(mask[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tapered_weekend_across_fall_back() {
        // America/Los_Angeles leaves DST at 2024-11-03 09:00 UTC, a Sunday
        let start = Utc.with_ymd_and_hms(2024, 11, 3, 8, 0, 0).unwrap();
        let series = TimeSeries::from_range(start, TimeDelta::hours(1), 48);
        let options = ForecastOptions::new()
            .with_seasonality(SeasonalityOptions::empty())
            .with_changepoints(ChangepointOptions::new())
            .with_weekend(WeekendOptions::enabled())
            .with_mask_window(WindowFunction::Hann)
            .with_dst(["America/Los_Angeles"]);
        let build = FeatureBuilder::new(options).build_training(&series).unwrap();

        let mask = build.features.get(&Feature::event(WEEKEND_EVENT)).unwrap();
        assert_eq!(mask.len(), 48);
        assert!(mask[0] > 0.0);
        // Monday 00:00 UTC onwards
        assert!(mask[16..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tapered_mask_needs_frequency() {
        let options = ForecastOptions::new()
            .with_weekend(WeekendOptions::enabled())
            .with_mask_window(WindowFunction::Hann);
        let result = FeatureBuilder::new(options).build_training(&six_hourly(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_degenerate_window_warns() {
        let builder = FeatureBuilder::new(
            ForecastOptions::new().with_changepoints(ChangepointOptions::new()),
        );
        let build = builder.build_training(&six_hourly(1)).unwrap();
        assert!(build.diagnostics.mentions("growth"));
        assert!(!build
            .features
            .contains(&Feature::growth(GrowthComponent::Intercept)));
    }
}
