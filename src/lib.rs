//! Forecast Features - temporal feature engineering for linear forecasters
//!
//! This crate turns a series of timestamps into the regressors a
//! Lasso-style forecasting model is fitted on:
//! - Growth and changepoint (trend regime) columns
//! - Fourier seasonality with colinear harmonic pruning
//! - Event, holiday and weekend masks with optional tapering
//! - Daylight-saving-time correction averaged over several timezones
//!
//! # Modules
//!
//! ## Core
//! - [`feature`] - Feature identities and the zero-padded [`FeatureSet`]
//! - [`builder`] - End-to-end design-matrix assembly
//! - [`generate`] - Individual feature generators
//!
//! ## Signal processing
//! - [`window`] - Taper functions and the window-mask engine
//! - [`timeseries`] - Timestamp series, padding and DST correction
//!
//! ## Configuration
//! - [`options`] - Serializable forecast options
//! - [`holidays`] - Pluggable holiday date resolution
//!
//! ## Utilities
//! - [`diagnostics`] - Non-fatal warning accumulation
//! - [`utils`] - Parallel column generation

// Core error handling
pub mod error;
pub mod diagnostics;

// Core modules
pub mod feature;
pub mod builder;
pub mod generate;

// Signal processing
pub mod window;
pub mod timeseries;

// Configuration
pub mod options;
pub mod holidays;

// Utilities
pub mod utils;

pub use builder::{FeatureBuild, FeatureBuilder};
pub use error::{ForecastError, Result};
pub use feature::{Feature, FeatureSet};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ForecastError, Result};
    pub use crate::diagnostics::{Diagnostics, Warning};

    // Features
    pub use crate::feature::{
        ChangepointComponent, Feature, FeatureSet, FeatureType, FourierComponent, GrowthComponent,
    };
    pub use crate::builder::{FeatureBuild, FeatureBuilder};

    // Configuration
    pub use crate::options::{
        Changepoint, ChangepointOptions, DstOptions, Event, EventOptions, ForecastOptions, GrowthType,
        HolidayOptions, SeasonalityConfig, SeasonalityOptions, WeekendOptions,
    };
    pub use crate::holidays::{FixedDateHolidays, HolidayResolver};

    // Time series and masks
    pub use crate::timeseries::{DstAdjuster, TimeSeries};
    pub use crate::window::WindowFunction;

    // Parallelism
    pub use crate::utils::ParallelConfig;
}
