//! Feature generators
//!
//! Each generator is a pure transform from timestamps (or the elapsed-time
//! column) and options to a [`FeatureSet`](crate::feature::FeatureSet):
//! - [`time`] - elapsed-time column
//! - [`growth`] - intercept and trend relative to the training window
//! - [`changepoint`] - bias/slope regime columns
//! - [`event`] - explicit event, holiday and weekend masks
//! - [`seasonality`] - Fourier terms, colinearity pruning, masked interactions

pub mod changepoint;
pub mod event;
pub mod growth;
pub mod seasonality;
pub mod time;

pub use changepoint::{auto_changepoints, changepoint_features, resolve_changepoints};
pub use event::{holiday_features, standard_event_features, weekend_features, WeekendPredicate, WEEKEND_EVENT};
pub use growth::growth_features;
pub use seasonality::{
    interaction_name, masked_seasonality, plan_harmonics, seasonality_features, HarmonicPlan,
};
pub use time::{time_features, TIME_FEATURE_NAME};
