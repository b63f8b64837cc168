//! Changepoint configuration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of evenly spaced changepoints when auto placement is on
pub const DEFAULT_AUTO_CHANGEPOINTS: usize = 25;

/// A named point in time where trend level and slope may shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changepoint {
    /// Feature name; empty names are keyed by their ordinal index
    pub name: String,
    pub time: DateTime<Utc>,
}

impl Changepoint {
    pub fn new(name: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}

/// Configuration for changepoint features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangepointOptions {
    /// Manually placed changepoints
    pub changepoints: Vec<Changepoint>,
    /// Replace manual changepoints with evenly spaced ones
    pub auto: bool,
    /// Number of changepoints placed when `auto` is set
    pub auto_count: usize,
    /// Also generate slope features
    pub enable_growth: bool,
}

impl Default for ChangepointOptions {
    fn default() -> Self {
        Self {
            changepoints: Vec::new(),
            auto: false,
            auto_count: DEFAULT_AUTO_CHANGEPOINTS,
            enable_growth: false,
        }
    }
}

impl ChangepointOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a manual changepoint
    pub fn with_changepoint(mut self, changepoint: Changepoint) -> Self {
        self.changepoints.push(changepoint);
        self
    }

    /// Builder method to enable auto placement of `count` changepoints
    pub fn with_auto(mut self, count: usize) -> Self {
        self.auto = true;
        self.auto_count = count;
        self
    }

    /// Builder method to enable slope features
    pub fn with_growth(mut self) -> Self {
        self.enable_growth = true;
        self
    }
}
