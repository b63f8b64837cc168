//! Seasonality configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the daily seasonality; only this config interacts with the weekend mask
pub const DAILY_SEASONALITY: &str = "daily";
/// Name of the weekly seasonality
pub const WEEKLY_SEASONALITY: &str = "weekly";

const DAY: Duration = Duration::from_secs(86_400);

/// One Fourier seasonality: `orders` sin/cos pairs of a base `period`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalityConfig {
    pub name: String,
    pub period: Duration,
    /// Highest harmonic order, harmonics `1..=orders` are generated
    pub orders: usize,
}

impl SeasonalityConfig {
    pub fn new(name: impl Into<String>, period: Duration, orders: usize) -> Self {
        Self {
            name: name.into(),
            period,
            orders,
        }
    }

    /// 24 hour seasonality named `daily`
    pub fn daily(orders: usize) -> Self {
        Self::new(DAILY_SEASONALITY, DAY, orders)
    }

    /// 7 day seasonality named `weekly`
    pub fn weekly(orders: usize) -> Self {
        Self::new(WEEKLY_SEASONALITY, DAY * 7, orders)
    }

    /// Shape check: a usable config has a name, a period and at least one order
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.period.is_zero() && self.orders > 0
    }

    pub fn is_daily(&self) -> bool {
        self.name == DAILY_SEASONALITY
    }
}

/// Configuration for seasonality features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityOptions {
    pub configs: Vec<SeasonalityConfig>,
}

impl Default for SeasonalityOptions {
    fn default() -> Self {
        Self {
            configs: vec![SeasonalityConfig::daily(12), SeasonalityConfig::weekly(6)],
        }
    }
}

impl SeasonalityOptions {
    /// Options with no seasonality configured
    pub fn empty() -> Self {
        Self {
            configs: Vec::new(),
        }
    }

    /// Builder method to add a config
    pub fn with_config(mut self, config: SeasonalityConfig) -> Self {
        self.configs.push(config);
        self
    }
}
