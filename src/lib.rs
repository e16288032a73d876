//! # Kite Alert Core Library
//!
//! This library provides the data structures and the forecast-to-report pipeline
//! for the kite alert bot. One run loads the spot catalog, fetches one forecast per
//! region, and turns the forecast series into a text report of kiteable spots.
//!
//! ## Data Flow
//! 1. **Catalog**: Load spots from CSV → [`Spot`] records in catalog order
//! 2. **Regions**: Group spots by region → at most one forecast fetch per region,
//!    bounded by a per-run quota
//! 3. **Selection**: Keep the samples for the target day and hours, convert m/s to
//!    knots and degrees to compass octants
//! 4. **Viability**: Compare each reading against the spot's wind window
//! 5. **Report**: Compose region sections and the multi-day outlook → notifier
//!
//! ## Core Types
//!
//! - [`Spot`]: A kite spot with its wind window
//! - [`ForecastSample`]: One raw entry of a forecast series
//! - [`Octant`]: One of the eight compass buckets used for wind direction
//! - [`WindReading`]: A forecast sample normalized for display and evaluation

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// Module declarations
pub mod catalog;
pub mod config;
pub mod fallback;
pub mod forecast;
pub mod notifier;
pub mod regions;
pub mod report;
pub mod selector;
pub mod viability;

/// Compass direction bucket, 45° wide, centered on the labelled bearing.
///
/// Variants are declared clockwise from north so that the discriminant is the
/// octant index used by [`Octant::from_degrees`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Octant {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Octant {
    /// All octants in index order (N = 0 … NW = 7).
    pub const ALL: [Octant; 8] = [
        Octant::N,
        Octant::NE,
        Octant::E,
        Octant::SE,
        Octant::S,
        Octant::SW,
        Octant::W,
        Octant::NW,
    ];

    /// Quantize a bearing in degrees to the nearest octant.
    ///
    /// Divides by 45°, rounds half away from zero and wraps modulo 8, so both 0°
    /// and 360° are `N` and a bearing of exactly 22.5° lands on `NE`.
    ///
    /// # Example
    /// ```
    /// use kite_alert_lib::Octant;
    ///
    /// assert_eq!(Octant::from_degrees(0.0), Octant::N);
    /// assert_eq!(Octant::from_degrees(22.6), Octant::NE);
    /// assert_eq!(Octant::from_degrees(350.0), Octant::N);
    /// ```
    pub fn from_degrees(degrees: f64) -> Octant {
        let index = ((degrees / 45.0).round() as i64).rem_euclid(8);
        Octant::ALL[index as usize]
    }

    /// Short compass label, e.g. `"NE"`.
    pub fn label(self) -> &'static str {
        match self {
            Octant::N => "N",
            Octant::NE => "NE",
            Octant::E => "E",
            Octant::SE => "SE",
            Octant::S => "S",
            Octant::SW => "SW",
            Octant::W => "W",
            Octant::NW => "NW",
        }
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a compass label is not one of the eight octants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compass direction '{0}'")]
pub struct UnknownOctant(pub String);

impl FromStr for Octant {
    type Err = UnknownOctant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Octant::ALL
            .into_iter()
            .find(|o| o.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| UnknownOctant(label.to_string()))
    }
}

/// A kite-surfing spot and the wind window in which it works.
///
/// Spots are immutable once loaded from the catalog. A spot is identified by its
/// name within its region.
#[derive(Clone, Debug, PartialEq)]
pub struct Spot {
    /// Display name of the spot
    pub name: String,
    /// Region the spot belongs to; spots sharing a region share one forecast
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Lowest usable wind speed in knots (inclusive)
    pub min_knots: i32,
    /// Highest usable wind speed in knots (inclusive)
    pub max_knots: i32,
    /// Wind directions that work at this spot
    pub best_directions: BTreeSet<Octant>,
    /// Free-text tide advice appended to the spot's report lines
    pub tide_notes: String,
}

impl Spot {
    /// True if `knots` falls within `[min_knots, max_knots]`.
    pub fn accepts_speed(&self, knots: i32) -> bool {
        (self.min_knots..=self.max_knots).contains(&knots)
    }

    /// True if the spot works with wind from `octant`.
    pub fn accepts_direction(&self, octant: Octant) -> bool {
        self.best_directions.contains(&octant)
    }
}

/// One entry of a raw forecast series, as delivered by a forecast client.
///
/// Timestamps are UTC. Wind speed stays in the source unit (m/s) until the
/// sample selector converts it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForecastSample {
    /// Forecast time (UTC)
    pub timestamp: NaiveDateTime,
    /// Wind speed in metres per second
    pub wind_speed: f64,
    /// Meteorological wind direction in degrees (where the wind blows from)
    pub wind_direction_degrees: f64,
}

impl ForecastSample {
    /// Calendar date of the sample (UTC).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour of day of the sample (UTC, 0-23).
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// A forecast sample normalized for display: whole knots and a compass octant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindReading {
    /// Wind speed rounded to the nearest knot
    pub knots: i32,
    /// Wind direction bucket
    pub octant: Octant,
}
