//! # Region Aggregation
//!
//! Spots that share a region share one forecast. This module groups the catalog
//! by region and fetches at most one forecast per region, within a per-run quota.
//!
//! Grouping and fetching are separate steps so the quota and error handling can be
//! exercised with a fake [`ForecastClient`]. Fetch failures never escape this
//! module: every region comes back with a [`RegionStatus`], either the series or
//! the reason it is unavailable.

use crate::forecast::ForecastClient;
use crate::{ForecastSample, Spot};
use log::{info, warn};
use std::fmt;

/// Spots of one region, in catalog order.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub name: String,
    pub spots: Vec<Spot>,
}

impl Region {
    /// Spot whose coordinates stand in for the whole region.
    pub fn representative(&self) -> Option<&Spot> {
        self.spots.first()
    }
}

/// Why a region has no forecast this run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unavailable {
    /// The fetch quota ran out before this region's turn
    QuotaExceeded,
    /// The forecast request failed; carries the reason
    FetchError(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::QuotaExceeded => write!(f, "unavailable: quota exceeded"),
            Unavailable::FetchError(reason) => write!(f, "unavailable: fetch error ({reason})"),
        }
    }
}

/// Forecast state of a region after aggregation.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionStatus {
    Available(Vec<ForecastSample>),
    Unavailable(Unavailable),
}

/// A region and its forecast (or the reason there is none).
#[derive(Clone, Debug, PartialEq)]
pub struct RegionForecast {
    pub region: Region,
    pub status: RegionStatus,
}

/// Forecast calls allowed and made so far in this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchBudget {
    pub quota: usize,
    pub used: usize,
}

impl FetchBudget {
    pub fn new(quota: usize) -> Self {
        FetchBudget { quota, used: 0 }
    }

    pub fn exhausted(&self) -> bool {
        self.used >= self.quota
    }

    /// Budget after one more call.
    pub fn spend(self) -> Self {
        FetchBudget {
            used: self.used + 1,
            ..self
        }
    }
}

/// Group spots by region, keeping first-seen region order and spot order.
pub fn group_by_region(spots: &[Spot]) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::new();
    for spot in spots {
        match regions.iter_mut().find(|r| r.name == spot.region) {
            Some(region) => region.spots.push(spot.clone()),
            None => regions.push(Region {
                name: spot.region.clone(),
                spots: vec![spot.clone()],
            }),
        }
    }
    regions
}

/// Fetch one forecast per region, in order, until the budget runs out.
///
/// Every attempted call spends budget, whether it succeeds or not. Regions met
/// after the budget is exhausted are marked [`Unavailable::QuotaExceeded`] without
/// calling the client. Returns the per-region results and the final budget.
pub fn aggregate(
    regions: Vec<Region>,
    client: &dyn ForecastClient,
    mut budget: FetchBudget,
) -> (Vec<RegionForecast>, FetchBudget) {
    let mut forecasts = Vec::with_capacity(regions.len());

    for region in regions {
        let status = match region.representative() {
            // Regions are built from spots, so this only guards hand-made input
            None => RegionStatus::Available(Vec::new()),
            Some(_) if budget.exhausted() => {
                warn!(
                    "⏭️  Skipping region {}: fetch quota of {} reached",
                    region.name, budget.quota
                );
                RegionStatus::Unavailable(Unavailable::QuotaExceeded)
            }
            Some(spot) => {
                budget = budget.spend();
                match client.fetch(spot.latitude, spot.longitude) {
                    Ok(series) => {
                        info!(
                            "🌬️  Region {}: {} forecast samples ({}/{} fetches)",
                            region.name,
                            series.len(),
                            budget.used,
                            budget.quota
                        );
                        RegionStatus::Available(series)
                    }
                    Err(e) => {
                        warn!("❌ Forecast fetch failed for region {}: {}", region.name, e);
                        RegionStatus::Unavailable(Unavailable::FetchError(e.to_string()))
                    }
                }
            }
        };

        forecasts.push(RegionForecast { region, status });
    }

    (forecasts, budget)
}
