//! Window (taper) functions and the window-mask engine
//!
//! Provides:
//! - A fixed set of named taper functions
//! - Masking of contiguous active spans with per-span tapering
//! - Boundary padding so spans cut by the series edges taper like interior spans

mod mask;

pub use mask::{active_spans, series_mask, window_mask};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Taper applied to each active span of a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WindowFunction {
    /// No tapering, every active point is 1.0
    #[default]
    Rectangular,
    Sine,
    Lanczos,
    Triangular,
    Hann,
    BartlettHann,
    Hamming,
    Blackman,
    BlackmanHarris,
    Nuttall,
    BlackmanNuttall,
    FlatTop,
}

impl WindowFunction {
    pub const ALL: [WindowFunction; 12] = [
        WindowFunction::Rectangular,
        WindowFunction::Sine,
        WindowFunction::Lanczos,
        WindowFunction::Triangular,
        WindowFunction::Hann,
        WindowFunction::BartlettHann,
        WindowFunction::Hamming,
        WindowFunction::Blackman,
        WindowFunction::BlackmanHarris,
        WindowFunction::Nuttall,
        WindowFunction::BlackmanNuttall,
        WindowFunction::FlatTop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "rectangular",
            WindowFunction::Sine => "sine",
            WindowFunction::Lanczos => "lanczos",
            WindowFunction::Triangular => "triangular",
            WindowFunction::Hann => "hann",
            WindowFunction::BartlettHann => "bartlett_hann",
            WindowFunction::Hamming => "hamming",
            WindowFunction::Blackman => "blackman",
            WindowFunction::BlackmanHarris => "blackman_harris",
            WindowFunction::Nuttall => "nuttall",
            WindowFunction::BlackmanNuttall => "blackman_nuttall",
            WindowFunction::FlatTop => "flat_top",
        }
    }

    /// Resolve a window by name, falling back to rectangular for empty or
    /// unknown names
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn is_rectangular(&self) -> bool {
        matches!(self, WindowFunction::Rectangular)
    }

    /// Weight of point `k` in a window of `n` points
    pub fn weight(&self, k: usize, n: usize) -> f64 {
        if n <= 1 {
            return 1.0;
        }
        let x = k as f64 / (n - 1) as f64;
        let cos = |m: f64| (2.0 * PI * m * x).cos();

        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Sine => (PI * x).sin(),
            WindowFunction::Lanczos => sinc(2.0 * x - 1.0),
            WindowFunction::Triangular => 1.0 - (2.0 * x - 1.0).abs(),
            WindowFunction::Hann => 0.5 - 0.5 * cos(1.0),
            WindowFunction::BartlettHann => 0.62 - 0.48 * (x - 0.5).abs() - 0.38 * cos(1.0),
            WindowFunction::Hamming => 0.54 - 0.46 * cos(1.0),
            WindowFunction::Blackman => 0.42 - 0.5 * cos(1.0) + 0.08 * cos(2.0),
            WindowFunction::BlackmanHarris => {
                0.35875 - 0.48829 * cos(1.0) + 0.14128 * cos(2.0) - 0.01168 * cos(3.0)
            }
            WindowFunction::Nuttall => {
                0.355768 - 0.487396 * cos(1.0) + 0.144232 * cos(2.0) - 0.012604 * cos(3.0)
            }
            WindowFunction::BlackmanNuttall => {
                0.3635819 - 0.4891775 * cos(1.0) + 0.1365995 * cos(2.0) - 0.0106411 * cos(3.0)
            }
            WindowFunction::FlatTop => {
                0.21557895 - 0.41663158 * cos(1.0) + 0.277263158 * cos(2.0)
                    - 0.083578947 * cos(3.0)
                    + 0.006947368 * cos(4.0)
            }
        }
    }

    /// Multiply `seq` in place by the window spanning its full length
    pub fn apply(&self, seq: &mut [f64]) {
        if self.is_rectangular() {
            return;
        }
        let n = seq.len();
        for (k, v) in seq.iter_mut().enumerate() {
            *v *= self.weight(k, n);
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for WindowFunction {
    fn from(name: String) -> Self {
        WindowFunction::from_name(&name)
    }
}

impl From<WindowFunction> for String {
    fn from(window: WindowFunction) -> Self {
        window.name().to_string()
    }
}

impl FromStr for WindowFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        WindowFunction::ALL
            .into_iter()
            .find(|w| w.name() == normalized || w.name().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown window function: {s}"))
    }
}
