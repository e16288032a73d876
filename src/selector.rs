//! # Forecast Sample Selection
//!
//! Turns a raw forecast series into the readings the report needs:
//! - **Detailed**: one reading per target hour on a single target date
//! - **Outlook**: one averaged reading per calendar date, built from midday samples
//!
//! Speeds are converted from m/s to knots and rounded; directions are quantized
//! to compass octants.

use crate::{ForecastSample, Octant, WindReading};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Metres per second to knots
pub const KNOTS_PER_MS: f64 = 1.94384;

/// Hour of day whose sample stands for the whole day in the outlook
pub const MIDDAY_HOUR: u32 = 12;

/// Convert a source speed (m/s) to knots.
pub fn to_knots(speed_ms: f64) -> f64 {
    speed_ms * KNOTS_PER_MS
}

/// Convert a source speed (m/s) to whole knots for display.
pub fn round_knots(speed_ms: f64) -> i32 {
    to_knots(speed_ms).round() as i32
}

/// Normalize one raw sample.
pub fn normalize(sample: &ForecastSample) -> WindReading {
    WindReading {
        knots: round_knots(sample.wind_speed),
        octant: Octant::from_degrees(sample.wind_direction_degrees),
    }
}

/// Calendar day targeted by a detailed report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportDay {
    Today,
    Tomorrow,
}

impl ReportDay {
    /// Offset in days from the current UTC date.
    pub fn offset(self) -> u64 {
        match self {
            ReportDay::Today => 0,
            ReportDay::Tomorrow => 1,
        }
    }

    /// Resolve the target date relative to `today` (UTC).
    pub fn date_from(self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(self.offset()))
            .unwrap_or(today)
    }
}

/// Pick the readings for `target_date` at the given hours, keyed by hour.
///
/// Samples on other dates or at other hours are dropped. When the series carries
/// two samples for the same hour, the later one in series order wins.
pub fn select_hours(
    series: &[ForecastSample],
    target_date: NaiveDate,
    hours: &[u32],
) -> BTreeMap<u32, WindReading> {
    let mut selected = BTreeMap::new();
    for sample in series {
        if sample.date() == target_date && hours.contains(&sample.hour()) {
            selected.insert(sample.hour(), normalize(sample));
        }
    }
    selected
}

/// Day-level reading for the outlook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayAverage {
    /// Octant of the first midday sample of the day
    pub octant: Octant,
    /// Floor of the mean of the day's midday knot values
    pub knots: i32,
}

/// Reduce a series to one reading per calendar date, from midday samples only.
///
/// Direction is taken from the first midday sample of the date since octants do
/// not average meaningfully. Speed is the integer mean of the rounded knots.
pub fn select_midday(series: &[ForecastSample]) -> BTreeMap<NaiveDate, DayAverage> {
    let mut collected: BTreeMap<NaiveDate, (Octant, Vec<i32>)> = BTreeMap::new();
    for sample in series.iter().filter(|s| s.hour() == MIDDAY_HOUR) {
        let reading = normalize(sample);
        collected
            .entry(sample.date())
            .or_insert_with(|| (reading.octant, Vec::new()))
            .1
            .push(reading.knots);
    }

    collected
        .into_iter()
        .map(|(date, (octant, speeds))| {
            let total: i64 = speeds.iter().map(|&k| i64::from(k)).sum();
            let knots = total.div_euclid(speeds.len() as i64) as i32;
            (date, DayAverage { octant, knots })
        })
        .collect()
}
