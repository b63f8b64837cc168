//! Changepoint placement and bias/slope features

use crate::diagnostics::Diagnostics;
use crate::feature::{ChangepointComponent, Feature, FeatureSet};
use crate::options::{Changepoint, ChangepointOptions};
use crate::timeseries::TimeSeries;
use chrono::{DateTime, TimeDelta, Utc};

/// `count` changepoints at `min + i * (max - min) / count`
pub fn auto_changepoints(min: DateTime<Utc>, max: DateTime<Utc>, count: usize) -> Vec<Changepoint> {
    if count == 0 {
        return Vec::new();
    }
    let step = (max - min) / count as i32;
    (0..count as i32)
        .map(|i| Changepoint::new(String::new(), min + step * i))
        .collect()
}

/// Changepoints to generate: auto-spaced over `[min, max]` when enabled,
/// otherwise the manual list
pub fn resolve_changepoints(
    options: &ChangepointOptions,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
) -> Vec<Changepoint> {
    if options.auto {
        auto_changepoints(min, max, options.auto_count)
    } else {
        options.changepoints.clone()
    }
}

/// Feature name of the changepoint at `index`, its ordinal when unnamed
pub fn changepoint_name(changepoint: &Changepoint, index: usize) -> String {
    if changepoint.name.is_empty() {
        index.to_string()
    } else {
        changepoint.name.clone()
    }
}

/// Bias and optional slope columns for one changepoint.
///
/// Bias is 1 at and after `tc`. Slope is `(t - tc) / delta` seconds after
/// `tc` where `delta` is the distance from `tc` to the end of training.
pub fn changepoint_columns(
    timestamps: &[DateTime<Utc>],
    tc: DateTime<Utc>,
    delta: TimeDelta,
    with_slope: bool,
) -> (Vec<f64>, Option<Vec<f64>>) {
    let bias = timestamps
        .iter()
        .map(|t| if *t >= tc { 1.0 } else { 0.0 })
        .collect();

    let slope = with_slope.then(|| {
        let delta_secs = seconds(delta);
        timestamps
            .iter()
            .map(|t| {
                if *t >= tc {
                    seconds(*t - tc) / delta_secs
                } else {
                    0.0
                }
            })
            .collect()
    });

    (bias, slope)
}

fn seconds(d: TimeDelta) -> f64 {
    d.num_nanoseconds()
        .map(|ns| ns as f64 / 1e9)
        .unwrap_or_else(|| d.num_seconds() as f64)
}

/// Features for every changepoint strictly before `train_end`.
///
/// Later changepoints would be all zero over the training rows and are
/// skipped with a warning.
pub fn changepoint_features(
    series: &TimeSeries,
    changepoints: &[Changepoint],
    train_end: DateTime<Utc>,
    enable_growth: bool,
    diagnostics: &mut Diagnostics,
) -> FeatureSet {
    let mut set = FeatureSet::new();
    for (index, changepoint) in changepoints.iter().enumerate() {
        let name = changepoint_name(changepoint, index);
        if changepoint.time >= train_end {
            diagnostics.warn(
                format!("changepoint:{name}"),
                format!(
                    "changepoint at {} is not before the end of training ({train_end}), skipping",
                    changepoint.time
                ),
            );
            continue;
        }

        let delta = train_end - changepoint.time;
        let (bias, slope) =
            changepoint_columns(series.timestamps(), changepoint.time, delta, enable_growth);
        set.set(Feature::changepoint(name.clone(), ChangepointComponent::Bias), bias);
        if let Some(slope) = slope {
            set.set(Feature::changepoint(name, ChangepointComponent::Slope), slope);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_auto_spacing() {
        let cps = auto_changepoints(t0(), t0() + TimeDelta::days(10), 5);
        let times: Vec<_> = cps.iter().map(|c| c.time).collect();
        assert_eq!(
            times,
            (0..5).map(|i| t0() + TimeDelta::days(2 * i)).collect::<Vec<_>>()
        );
        assert!(auto_changepoints(t0(), t0(), 0).is_empty());
    }

    #[test]
    fn test_auto_replaces_manual() {
        let options = ChangepointOptions::new()
            .with_changepoint(Changepoint::new("manual", t0()))
            .with_auto(3);
        let resolved = resolve_changepoints(&options, t0(), t0() + TimeDelta::days(3));
        assert_eq!(resolved.len(), 3);
        assert!(resolved.iter().all(|c| c.name.is_empty()));
    }

    #[test]
    fn test_bias_and_slope() {
        let series = TimeSeries::from_range(t0(), TimeDelta::hours(1), 6);
        let tc = t0() + TimeDelta::hours(2);
        let (bias, slope) = changepoint_columns(series.timestamps(), tc, TimeDelta::hours(4), true);

        assert_eq!(bias, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(slope.unwrap(), vec![0.0, 0.0, 0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_features_skip_changepoints_after_training() {
        let series = TimeSeries::from_range(t0(), TimeDelta::hours(1), 6);
        let train_end = t0() + TimeDelta::hours(5);
        let changepoints = vec![
            Changepoint::new("", t0() + TimeDelta::hours(1)),
            Changepoint::new("late", t0() + TimeDelta::hours(9)),
            Changepoint::new("edge", train_end),
        ];
        let mut diag = Diagnostics::new();
        let set = changepoint_features(&series, &changepoints, train_end, true, &mut diag);

        assert_eq!(set.column_names(), vec!["chpnt_0_bias", "chpnt_0_slope"]);
        assert!(diag.mentions("changepoint:late"));
        assert!(diag.mentions("changepoint:edge"));

        let slope = set
            .get(&Feature::changepoint("0", ChangepointComponent::Slope))
            .unwrap();
        assert!((slope[5] - 1.0).abs() < 1e-12);
    }
}
