//! Time series module
//!
//! Provides the timestamp series consumed by feature generation:
//! - Native-zone aware timestamp storage
//! - Frequency inference and boundary padding
//! - Daylight-saving-time correction across configured timezones

mod dst;
mod series;

pub use dst::DstAdjuster;
pub use series::TimeSeries;

use chrono::{DateTime, Utc};

/// Epoch value in fractional seconds, nanoseconds kept in the fraction
pub fn epoch_seconds(t: &DateTime<Utc>) -> f64 {
    t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) / 1e9
}
