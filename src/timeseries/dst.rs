//! Daylight-saving-time correction
//!
//! Shifts each timestamp by the average DST offset of the configured zones
//! that are in DST at that instant, so local-time patterns (a 9am peak)
//! stay aligned with the elapsed-time seasonality across transitions.

use super::TimeSeries;
use crate::diagnostics::Diagnostics;
use chrono::{DateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

/// Reference dates used to find each zone's standard and DST offsets
const REFERENCE_DECEMBER: (i32, u32, u32) = (2024, 12, 21);
const REFERENCE_JUNE: (i32, u32, u32) = (2024, 6, 21);

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoneShift {
    zone: Tz,
    /// DST offset minus standard offset
    delta: TimeDelta,
}

impl ZoneShift {
    fn new(zone: Tz) -> Self {
        let offsets = [REFERENCE_DECEMBER, REFERENCE_JUNE].map(|(y, m, d)| {
            let noon = Utc
                .with_ymd_and_hms(y, m, d, 12, 0, 0)
                .single()
                .unwrap_or_default();
            zone.offset_from_utc_datetime(&noon.naive_utc())
        });

        let total = |i: usize| i64::from(offsets[i].fix().local_minus_utc());
        let in_dst = |i: usize| offsets[i].dst_offset() != TimeDelta::zero();

        let delta_secs = match (in_dst(0), in_dst(1)) {
            (false, true) => total(1) - total(0),
            (true, false) => total(0) - total(1),
            _ => 0,
        };

        Self {
            zone,
            delta: TimeDelta::seconds(delta_secs),
        }
    }

    fn in_dst(&self, t: &DateTime<Utc>) -> bool {
        self.zone
            .offset_from_utc_datetime(&t.naive_utc())
            .dst_offset()
            != TimeDelta::zero()
    }
}

/// Averaged DST correction across zero or more timezones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DstAdjuster {
    zones: Vec<ZoneShift>,
}

impl DstAdjuster {
    /// Resolve IANA zone names.
    ///
    /// Names that do not resolve are replaced by `native` and reported in
    /// `diagnostics`; they still count toward the averaging denominator.
    pub fn new<S: AsRef<str>>(timezones: &[S], native: Tz, diagnostics: &mut Diagnostics) -> Self {
        let zones = timezones
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let zone = name.parse::<Tz>().unwrap_or_else(|_| {
                    diagnostics.warn(
                        format!("timezone:{name}"),
                        format!("unknown timezone, falling back to {}", native.name()),
                    );
                    native
                });
                ZoneShift::new(zone)
            })
            .collect();
        Self { zones }
    }

    /// Adjuster over already resolved zones
    pub fn from_zones(zones: &[Tz]) -> Self {
        Self {
            zones: zones.iter().copied().map(ZoneShift::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Correction to add to `t`: summed offsets of zones in DST divided by
    /// the number of configured zones
    pub fn correction(&self, t: &DateTime<Utc>) -> TimeDelta {
        if self.zones.is_empty() {
            return TimeDelta::zero();
        }
        let total_ns: i64 = self
            .zones
            .iter()
            .filter(|z| z.in_dst(t))
            .map(|z| z.delta.num_nanoseconds().unwrap_or(0))
            .sum();
        TimeDelta::nanoseconds(total_ns / self.zones.len() as i64)
    }

    pub fn adjust_timestamp(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        t + self.correction(&t)
    }

    /// Apply the correction to every timestamp.
    ///
    /// The result keeps the uncorrected series for padding.
    pub fn adjust(&self, series: &TimeSeries) -> TimeSeries {
        if self.zones.is_empty() {
            return series.clone();
        }
        series.corrected(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_zone_delta() {
        let la = ZoneShift::new(chrono_tz::America::Los_Angeles);
        assert_eq!(la.delta, TimeDelta::hours(1));

        let sydney = ZoneShift::new(chrono_tz::Australia::Sydney);
        assert_eq!(sydney.delta, TimeDelta::hours(1));

        let lord_howe = ZoneShift::new(chrono_tz::Australia::Lord_Howe);
        assert_eq!(lord_howe.delta, TimeDelta::minutes(30));

        let tokyo = ZoneShift::new(chrono_tz::Asia::Tokyo);
        assert_eq!(tokyo.delta, TimeDelta::zero());
    }

    #[test]
    fn test_los_angeles_fall_back() {
        let adjuster = DstAdjuster::from_zones(&[chrono_tz::America::Los_Angeles]);

        let before = utc("2024-11-03T08:59:59Z");
        let after = utc("2024-11-03T09:00:00Z");

        assert_eq!(adjuster.correction(&before), TimeDelta::hours(1));
        assert_eq!(adjuster.correction(&after), TimeDelta::zero());
        assert_eq!(adjuster.adjust_timestamp(before), utc("2024-11-03T09:59:59Z"));
        assert_eq!(adjuster.adjust_timestamp(after), after);
    }

    #[test]
    fn test_average_over_all_configured_zones() {
        let adjuster = DstAdjuster::from_zones(&[
            chrono_tz::America::Los_Angeles,
            chrono_tz::Asia::Tokyo,
        ]);
        let summer = utc("2024-07-01T12:00:00Z");
        assert_eq!(adjuster.correction(&summer), TimeDelta::minutes(30));
    }

    #[test]
    fn test_no_zones_is_passthrough() {
        let adjuster = DstAdjuster::default();
        let series = TimeSeries::new(vec![utc("2024-07-01T12:00:00Z")]);
        assert_eq!(adjuster.adjust(&series), series);
    }

    #[test]
    fn test_padding_across_fall_back_uses_uncorrected_frequency() {
        let adjuster = DstAdjuster::from_zones(&[chrono_tz::America::Los_Angeles]);
        let raw = TimeSeries::from_range(utc("2024-11-03T08:00:00Z"), TimeDelta::hours(1), 4);
        let adjusted = adjuster.adjust(&raw);

        // 08:00 and 09:00 both land on 09:00 after correction
        assert!(adjusted.infer_frequency().is_err());

        let (padded, offset) = adjusted.padded(TimeDelta::hours(3)).unwrap();
        assert_eq!(offset, 3);
        assert_eq!(padded.len(), 10);
        assert_eq!(&padded.timestamps()[offset..offset + 4], adjusted.timestamps());
        assert_eq!(padded.first().unwrap(), utc("2024-11-03T06:00:00Z"));
        assert_eq!(padded.last().unwrap(), utc("2024-11-03T14:00:00Z"));
    }

    #[test]
    fn test_padding_across_spring_forward_keeps_point_count() {
        let adjuster = DstAdjuster::from_zones(&[chrono_tz::America::Los_Angeles]);
        let raw = TimeSeries::from_range(utc("2024-03-10T09:00:00Z"), TimeDelta::hours(1), 3);
        let adjusted = adjuster.adjust(&raw);
        assert_eq!(adjusted.infer_frequency().unwrap(), TimeDelta::hours(2));

        let (padded, offset) = adjusted.padded(TimeDelta::hours(2)).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(padded.first().unwrap(), utc("2024-03-10T07:00:00Z"));
        assert_eq!(&padded.timestamps()[offset..offset + 3], adjusted.timestamps());
    }

    #[test]
    fn test_unknown_zone_falls_back_to_native() {
        let mut diag = Diagnostics::new();
        let adjuster = DstAdjuster::new(&["Mars/Olympus_Mons"], Tz::UTC, &mut diag);

        assert!(diag.mentions("timezone:Mars/Olympus_Mons"));
        assert!(!adjuster.is_empty());
        assert_eq!(
            adjuster.correction(&utc("2024-07-01T12:00:00Z")),
            TimeDelta::zero()
        );
    }
}
