//! # Wind Forecast Fetching
//!
//! This module handles all network operations for fetching wind forecasts. The
//! production source is the OpenWeatherMap 5-day / 3-hour forecast, queried once per
//! region with the coordinates of the region's first spot.
//!
//! ## Data Source
//!
//! ### OpenWeatherMap 5 day / 3 hour forecast
//! - **URL**: `https://api.openweathermap.org/data/2.5/forecast?lat=..&lon=..&appid=..&units=metric`
//! - **Format**: JSON, `list[]` of entries 3 hours apart covering ~5 days
//! - **Fields used**: `dt` (unix seconds, UTC), `wind.speed` (m/s), `wind.deg`
//!
//! ## Error Handling
//!
//! The client distinguishes every failure mode so the region aggregator can report it:
//! - **Network errors and timeouts**: the HTTP client is built with a fixed timeout
//! - **Server errors**: non-2xx responses are failures, the status is kept
//! - **Parse failures**: unexpected JSON structure or an invalid timestamp
//!
//! There is no retry. A failed fetch degrades only its own region for this run.

use crate::config::ForecastConfig;
use crate::ForecastSample;
use chrono::DateTime;
use log::debug;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a forecast series.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// HTTP request failed (network, timeout, or protocol error)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Server answered with a non-success status
    #[error("forecast service returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Response body was not the expected forecast JSON
    #[error("malformed forecast payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// An entry carried a timestamp outside the representable range
    #[error("invalid forecast timestamp {0}")]
    Timestamp(i64),
}

// The request URL carries the API key, so it never reaches the error text
impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::Http(err.without_url())
    }
}

/// Source of raw forecast series, one call per coordinate.
///
/// The region aggregator only depends on this trait, so tests inject a fake
/// client and never touch the network.
pub trait ForecastClient {
    /// Fetch the forecast series for a coordinate.
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>, ForecastError>;
}

/// Blocking OpenWeatherMap forecast client.
pub struct OpenWeatherClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Build a client with the configured endpoint and timeout.
    pub fn new(config: &ForecastConfig, api_key: String) -> Result<Self, ForecastError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(OpenWeatherClient {
            http,
            base_url: config.base_url.clone(),
            api_key,
        })
    }
}

impl ForecastClient for OpenWeatherClient {
    fn fetch(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastSample>, ForecastError> {
        debug!("Fetching forecast for {:.3},{:.3}", latitude, longitude);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status { status });
        }

        let body = response.text()?;
        parse_forecast(&body)
    }
}

// -- Payload decoding --

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    wind: WindEntry,
}

#[derive(Debug, Deserialize)]
struct WindEntry {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

/// Decode an OpenWeatherMap forecast body into samples, keeping the series order.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastSample>, ForecastError> {
    let response: ForecastResponse = serde_json::from_str(body)?;

    response
        .list
        .into_iter()
        .map(|entry| {
            let timestamp = DateTime::from_timestamp(entry.dt, 0)
                .ok_or(ForecastError::Timestamp(entry.dt))?
                .naive_utc();
            Ok(ForecastSample {
                timestamp,
                wind_speed: entry.wind.speed,
                wind_direction_degrees: entry.wind.deg,
            })
        })
        .collect()
}
