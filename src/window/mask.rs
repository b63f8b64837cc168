//! Mask generation over contiguous active spans

use super::WindowFunction;
use crate::error::Result;
use crate::timeseries::TimeSeries;
use chrono::{DateTime, TimeDelta, Utc};
use std::ops::Range;

/// Extra padding added on top of the caller's look-around
const PAD_SAFETY_MARGIN_SECS: i64 = 86_400;

/// Index ranges of maximal runs where `is_active` holds, including a run
/// that extends to the end of the series
pub fn active_spans<F>(timestamps: &[DateTime<Utc>], is_active: F) -> Vec<Range<usize>>
where
    F: Fn(&DateTime<Utc>) -> bool,
{
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, t) in timestamps.iter().enumerate() {
        match (is_active(t), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                spans.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..timestamps.len());
    }
    spans
}

/// 0/1 mask of `is_active` with `window` applied to each active span
/// independently. Inactive points stay exactly 0.0.
pub fn window_mask<F>(timestamps: &[DateTime<Utc>], is_active: F, window: WindowFunction) -> Vec<f64>
where
    F: Fn(&DateTime<Utc>) -> bool,
{
    let mut mask = vec![0.0; timestamps.len()];
    for span in active_spans(timestamps, is_active) {
        let run = &mut mask[span];
        run.fill(1.0);
        window.apply(run);
    }
    mask
}

/// Mask over a series, padding the boundaries for tapered windows.
///
/// A tapered span needs its true temporal extent, so for non-rectangular
/// windows the series is extended by `look_around` plus a safety margin on
/// both sides before masking and the result is truncated back to the
/// original range. Fails if the frequency cannot be inferred.
pub fn series_mask<F>(
    series: &TimeSeries,
    is_active: F,
    window: WindowFunction,
    look_around: TimeDelta,
) -> Result<Vec<f64>>
where
    F: Fn(&DateTime<Utc>) -> bool,
{
    if window.is_rectangular() {
        return Ok(window_mask(series.timestamps(), is_active, window));
    }

    let pad = look_around.max(TimeDelta::zero()) + TimeDelta::seconds(PAD_SAFETY_MARGIN_SECS);
    let (padded, offset) = series.padded(pad)?;
    let mask = window_mask(padded.timestamps(), is_active, window);
    Ok(mask[offset..offset + series.len()].to_vec())
}
