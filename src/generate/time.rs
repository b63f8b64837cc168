//! Raw time feature

use crate::feature::{Feature, FeatureSet};
use crate::timeseries::TimeSeries;

/// Name of the elapsed-time feature seasonality is computed from
pub const TIME_FEATURE_NAME: &str = "epoch";

/// `tfeat_epoch`: every timestamp as fractional epoch seconds
pub fn time_features(series: &TimeSeries) -> FeatureSet {
    let mut set = FeatureSet::new();
    set.set(Feature::time(TIME_FEATURE_NAME), series.epochs());
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    #[test]
    fn test_time_feature_is_monotonic_epoch() {
        let start = Utc.timestamp_opt(1_000, 0).unwrap();
        let series = TimeSeries::from_range(start, TimeDelta::milliseconds(500), 3);
        let set = time_features(&series);
        let values = set.get(&Feature::time(TIME_FEATURE_NAME)).unwrap();
        assert_eq!(values, &[1_000.0, 1_000.5, 1_001.0]);
    }
}
