//! Timestamp series with a native timezone

use super::{epoch_seconds, DstAdjuster};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

/// Ordered timestamps plus the zone they are natively observed in.
///
/// Windowing and padding assume uniform spacing; the frequency is taken
/// from the first two points.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    zone: Tz,
    /// Uncorrected series when these timestamps are DST adjusted
    correction: Option<Box<Correction>>,
}

#[derive(Debug, Clone, PartialEq)]
struct Correction {
    source: TimeSeries,
    adjuster: DstAdjuster,
}

impl TimeSeries {
    /// Create a series in UTC
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            timestamps,
            zone: Tz::UTC,
            correction: None,
        }
    }

    /// `n` points spaced `freq` apart starting at `start`, stopping early
    /// at the end of the representable range
    pub fn from_range(start: DateTime<Utc>, freq: TimeDelta, n: usize) -> Self {
        let timestamps = std::iter::successors(Some(start), |t| t.checked_add_signed(freq))
            .take(n)
            .collect();
        Self::new(timestamps)
    }

    /// Set the native zone used for calendar lookups
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        if let Some(correction) = self.correction.take() {
            let Correction { source, adjuster } = *correction;
            self.correction = Some(Box::new(Correction {
                source: source.with_zone(zone),
                adjuster,
            }));
        }
        self
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.timestamps.first().copied()
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    pub fn min(&self) -> Option<DateTime<Utc>> {
        self.timestamps.iter().min().copied()
    }

    pub fn max(&self) -> Option<DateTime<Utc>> {
        self.timestamps.iter().max().copied()
    }

    /// Epoch seconds of every timestamp
    pub fn epochs(&self) -> Vec<f64> {
        self.timestamps.iter().map(epoch_seconds).collect()
    }

    /// Spacing between the first two points
    pub fn infer_frequency(&self) -> Result<TimeDelta> {
        if self.timestamps.len() < 2 {
            return Err(ForecastError::CannotInferFrequency {
                points: self.timestamps.len(),
            });
        }
        let freq = self.timestamps[1] - self.timestamps[0];
        if freq <= TimeDelta::zero() {
            return Err(ForecastError::InvalidFrequency(format!(
                "first two timestamps are not increasing ({} then {})",
                self.timestamps[0], self.timestamps[1]
            )));
        }
        Ok(freq)
    }

    /// Extend both ends with synthetic points at the inferred frequency.
    ///
    /// Enough points are added to cover `pad` on each side. Returns the
    /// padded series and the index at which the original points start;
    /// the original range is `offset..offset + self.len()`.
    ///
    /// A DST-corrected series is padded in its uncorrected timeline and the
    /// synthetic points are corrected afterwards, so a transition near
    /// either end does not distort the inferred frequency.
    pub fn padded(&self, pad: TimeDelta) -> Result<(TimeSeries, usize)> {
        if let Some(correction) = &self.correction {
            let (padded, offset) = correction.source.padded(pad)?;
            return Ok((correction.adjuster.adjust(&padded), offset));
        }

        let freq = self.infer_frequency()?;
        let (first, last) = match (self.first(), self.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ForecastError::CannotInferFrequency { points: 0 }),
        };

        let freq_ns = freq.num_nanoseconds().unwrap_or(i64::MAX);
        let pad_ns = pad.num_nanoseconds().unwrap_or(i64::MAX).max(0);
        let n_pad = i32::try_from(pad_ns / freq_ns + i64::from(pad_ns % freq_ns != 0))
            .map_err(|_| {
                ForecastError::InvalidFrequency(format!(
                    "padding {pad} at frequency {freq} needs too many points"
                ))
            })?;

        let step = |base: DateTime<Utc>, k: i32| {
            freq.checked_mul(k)
                .and_then(|offset| base.checked_add_signed(offset))
                .ok_or_else(|| {
                    ForecastError::InvalidFrequency(format!(
                        "padding {pad} at frequency {freq} leaves the representable range"
                    ))
                })
        };

        let n_pad_len = n_pad as usize;
        let mut timestamps = Vec::with_capacity(self.len() + 2 * n_pad_len);
        for k in (1..=n_pad).rev() {
            timestamps.push(step(first, -k)?);
        }
        timestamps.extend_from_slice(&self.timestamps);
        for k in 1..=n_pad {
            timestamps.push(step(last, k)?);
        }

        Ok((TimeSeries::new(timestamps).with_zone(self.zone), n_pad_len))
    }

    /// Same series with every timestamp transformed by `f`
    pub fn map(&self, f: impl Fn(DateTime<Utc>) -> DateTime<Utc>) -> TimeSeries {
        TimeSeries::new(self.timestamps.iter().map(|&t| f(t)).collect()).with_zone(self.zone)
    }

    /// Timestamps shifted by `adjuster`, remembering this series as the
    /// uncorrected source for padding
    pub(crate) fn corrected(&self, adjuster: &DstAdjuster) -> TimeSeries {
        let mut adjusted = self.map(|t| adjuster.adjust_timestamp(t));
        adjusted.correction = Some(Box::new(Correction {
            source: self.clone(),
            adjuster: adjuster.clone(),
        }));
        adjusted
    }
}

impl From<Vec<DateTime<Utc>>> for TimeSeries {
    fn from(timestamps: Vec<DateTime<Utc>>) -> Self {
        TimeSeries::new(timestamps)
    }
}
