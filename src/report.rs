//! # Report Composition
//!
//! This module turns per-region forecasts into the text delivered to the chat.
//! It has two layouts:
//!
//! ### Detailed report (today or tomorrow)
//! ```text
//! 🌅 Kite Alert: today, Sat 18 Oct
//!
//! 📍 Tarifa
//! 🏄 Los Lances
//! ✅ ON  E  18 kn @ 09:00
//! ❌ OFF E  31 kn @ 15:00
//! 🌊 Any tide
//!
//! 📍 Algarve
//! ⚠️ Forecast unavailable: quota exceeded
//! ```
//!
//! ### Outlook (one line per kiteable day)
//! ```text
//! 📅 Kite Alert: outlook
//!
//! 📍 Tarifa
//! 🟢 Sun 19 Oct: 17 kn E
//! 🟢 Tue 21 Oct: 14 kn W
//! ```
//!
//! Region and spot order follow the catalog. Hour lines and outlook days are
//! sorted. Regions with nothing to show are left out, except unavailable regions
//! in the detailed report, which keep their header and an explanatory line.

use crate::config::ReportConfig;
use crate::forecast::ForecastClient;
use crate::regions::{self, FetchBudget, RegionForecast, RegionStatus};
use crate::selector::{self, ReportDay};
use crate::viability;
use crate::{ForecastSample, Spot};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use log::{debug, info};

/// Label format for dates in banners and outlook lines, e.g. `Sat 18 Oct`
pub const DATE_FORMAT: &str = "%a %d %b";

/// Which report a run produces, decided by the UTC hour at invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Before noon: detailed report for today
    Morning,
    /// Noon or later: detailed report for tomorrow plus the outlook
    Evening,
}

impl RunMode {
    pub fn for_time(now: DateTime<Utc>) -> RunMode {
        if now.hour() < 12 {
            RunMode::Morning
        } else {
            RunMode::Evening
        }
    }
}

/// A titled block of report lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    pub lines: Vec<String>,
}

impl Section {
    fn region(name: &str, lines: Vec<String>) -> Section {
        Section {
            header: format!("📍 {name}"),
            lines,
        }
    }

    fn render(&self) -> String {
        let mut text = self.header.clone();
        for line in &self.lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }
}

/// Join a banner and sections with blank lines in between.
///
/// `empty_note` stands in for the sections when there are none, so a delivered
/// message always says something after its banner.
pub fn compose(banner: &str, sections: &[Section], empty_note: &str) -> String {
    let body = if sections.is_empty() {
        empty_note.to_string()
    } else {
        sections
            .iter()
            .map(Section::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    format!("{banner}\n\n{body}")
}

/// Lines for one spot: one per selected hour, then its tide notes, plus the
/// number of kiteable hours among them. Empty when no hour of the series matched.
fn spot_lines(
    spot: &Spot,
    series: &[ForecastSample],
    target_date: NaiveDate,
    hours: &[u32],
) -> (Vec<String>, usize) {
    let selected = selector::select_hours(series, target_date, hours);
    if selected.is_empty() {
        return (Vec::new(), 0);
    }

    let mut lines = vec![format!("🏄 {}", spot.name)];
    let mut kiteable_hours = 0;
    for (&hour, reading) in &selected {
        let assessment = viability::assess(spot, hour, reading);
        if assessment.kiteable {
            kiteable_hours += 1;
        }
        lines.push(assessment.line);
    }
    if !spot.tide_notes.is_empty() {
        lines.push(format!("🌊 {}", spot.tide_notes));
    }
    (lines, kiteable_hours)
}

/// Region sections of the detailed report for `target_date`.
pub fn detailed_sections(
    forecasts: &[RegionForecast],
    target_date: NaiveDate,
    hours: &[u32],
) -> Vec<Section> {
    forecasts
        .iter()
        .filter_map(|forecast| {
            let region = &forecast.region;
            match &forecast.status {
                RegionStatus::Unavailable(reason) => Some(Section::region(
                    &region.name,
                    vec![format!("⚠️ Forecast {reason}")],
                )),
                RegionStatus::Available(series) => {
                    let mut lines = Vec::new();
                    let mut kiteable_hours = 0;
                    for spot in &region.spots {
                        let (spot_lines, kiteable) =
                            spot_lines(spot, series, target_date, hours);
                        lines.extend(spot_lines);
                        kiteable_hours += kiteable;
                    }
                    debug!(
                        "{}: {} kiteable spot-hour(s) on {}",
                        region.name, kiteable_hours, target_date
                    );
                    (!lines.is_empty()).then(|| Section::region(&region.name, lines))
                }
            }
        })
        .collect()
}

/// Region sections of the outlook: days on which any spot's speed window
/// contains the day's average. Direction is not checked at this granularity.
pub fn outlook_sections(forecasts: &[RegionForecast]) -> Vec<Section> {
    forecasts
        .iter()
        .filter_map(|forecast| {
            let RegionStatus::Available(series) = &forecast.status else {
                return None;
            };

            let lines: Vec<String> = selector::select_midday(series)
                .into_iter()
                .filter(|(_, day)| {
                    forecast
                        .region
                        .spots
                        .iter()
                        .any(|spot| spot.accepts_speed(day.knots))
                })
                .map(|(date, day)| {
                    format!(
                        "🟢 {}: {} kn {}",
                        date.format(DATE_FORMAT),
                        day.knots,
                        day.octant
                    )
                })
                .collect();

            (!lines.is_empty()).then(|| Section::region(&forecast.region.name, lines))
        })
        .collect()
}

/// Full detailed report for `day`, relative to `today` (UTC).
pub fn detailed_report(
    config: &ReportConfig,
    forecasts: &[RegionForecast],
    day: ReportDay,
    today: NaiveDate,
) -> String {
    let target_date = day.date_from(today);
    let (glyph, label) = match day {
        ReportDay::Today => ("🌅", "today"),
        ReportDay::Tomorrow => ("🌇", "tomorrow"),
    };
    let banner = format!(
        "{glyph} {}: {label}, {}",
        config.title,
        target_date.format(DATE_FORMAT)
    );

    compose(
        &banner,
        &detailed_sections(forecasts, target_date, &config.target_hours),
        "No forecast data for the selected hours.",
    )
}

/// Full outlook report over every day the forecasts cover.
pub fn outlook_report(config: &ReportConfig, forecasts: &[RegionForecast]) -> String {
    compose(
        &format!("📅 {}: outlook", config.title),
        &outlook_sections(forecasts),
        "No kiteable days in the outlook.",
    )
}

/// Report text for a run mode.
pub fn build_report(
    config: &ReportConfig,
    mode: RunMode,
    forecasts: &[RegionForecast],
    today: NaiveDate,
) -> String {
    match mode {
        RunMode::Morning => detailed_report(config, forecasts, ReportDay::Today, today),
        RunMode::Evening => format!(
            "{}\n\n{}",
            detailed_report(config, forecasts, ReportDay::Tomorrow, today),
            outlook_report(config, forecasts)
        ),
    }
}

/// Run the whole pipeline: group, fetch within `budget`, select and compose.
///
/// Fetch failures end up inside the text; this function cannot fail.
pub fn generate(
    config: &ReportConfig,
    spots: &[Spot],
    client: &dyn ForecastClient,
    budget: FetchBudget,
    now: DateTime<Utc>,
) -> String {
    let mode = RunMode::for_time(now);
    let groups = regions::group_by_region(spots);
    info!(
        "🧭 {:?} run: {} spots in {} regions",
        mode,
        spots.len(),
        groups.len()
    );

    let (forecasts, budget) = regions::aggregate(groups, client, budget);
    info!("📊 Used {}/{} forecast fetches", budget.used, budget.quota);

    build_report(config, mode, &forecasts, now.date_naive())
}
