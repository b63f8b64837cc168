//! Forecast feature configuration
//!
//! Everything the builder needs to know about which columns to generate:
//! - Changepoints (manual or auto-spaced) and growth type
//! - Fourier seasonality configs
//! - Events, recurring holidays and the weekend mask
//! - DST correction zones
//! - The taper window applied to event masks

mod changepoint;
mod duration;
mod event;
mod seasonality;

pub use changepoint::{Changepoint, ChangepointOptions, DEFAULT_AUTO_CHANGEPOINTS};
pub use event::{clamp_buffer, Event, EventOptions, HolidayOptions, WeekendOptions, MAX_BUFFER_HOURS};
pub use seasonality::{SeasonalityConfig, SeasonalityOptions, DAILY_SEASONALITY, WEEKLY_SEASONALITY};

use crate::utils::ParallelConfig;
use crate::window::WindowFunction;
use serde::{Deserialize, Serialize};

/// Trend shape; the intercept is always added when the training window is non-degenerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthType {
    None,
    #[default]
    Linear,
    Quadratic,
}

/// Configuration for daylight-saving-time correction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DstOptions {
    pub enabled: bool,
    /// IANA zone names whose DST offsets are averaged
    pub timezones: Vec<String>,
}

/// Configuration for building a forecast design matrix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastOptions {
    pub changepoints: ChangepointOptions,
    pub growth: GrowthType,
    pub seasonality: SeasonalityOptions,
    pub events: EventOptions,
    pub weekend: WeekendOptions,
    pub dst: DstOptions,
    /// Taper applied to event, holiday and weekend masks
    pub mask_window: WindowFunction,
    pub parallel: ParallelConfig,
}

impl ForecastOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set growth type
    pub fn with_growth(mut self, growth: GrowthType) -> Self {
        self.growth = growth;
        self
    }

    /// Builder method to set changepoint options
    pub fn with_changepoints(mut self, changepoints: ChangepointOptions) -> Self {
        self.changepoints = changepoints;
        self
    }

    /// Builder method to replace all seasonality configs
    pub fn with_seasonality(mut self, seasonality: SeasonalityOptions) -> Self {
        self.seasonality = seasonality;
        self
    }

    /// Builder method to add an event
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.events.push(event);
        self
    }

    /// Builder method to set holiday options
    pub fn with_holidays(mut self, holidays: HolidayOptions) -> Self {
        self.events.holidays = holidays;
        self
    }

    /// Builder method to set weekend options
    pub fn with_weekend(mut self, weekend: WeekendOptions) -> Self {
        self.weekend = weekend;
        self
    }

    /// Builder method to enable DST correction for `timezones`
    pub fn with_dst<S: Into<String>>(mut self, timezones: impl IntoIterator<Item = S>) -> Self {
        self.dst = DstOptions {
            enabled: true,
            timezones: timezones.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Builder method to set the mask taper
    pub fn with_mask_window(mut self, window: WindowFunction) -> Self {
        self.mask_window = window;
        self
    }

    /// Builder method to set parallel generation
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}
