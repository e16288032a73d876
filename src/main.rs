//! # Kite Alert Application Entry Point
//!
//! One invocation is one run: announce liveness, build the report, deliver it,
//! exit. Scheduling (cron or CI) lives outside the binary. The report layout
//! (today, or tomorrow plus outlook) follows the UTC hour at start-up.
//!
//! Credentials come from the environment (`OWM_API_KEY`, `TELEGRAM_TOKEN`,
//! `CHAT_ID` by default). Without Telegram credentials the messages are printed.


use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use env_logger::Env;
use kite_alert_lib::{
    catalog,
    config::Config,
    fallback,
    forecast::OpenWeatherClient,
    notifier::{self, Notifier},
    regions::FetchBudget,
    report,
};
use log::{error, info};

/// Build the report text for `now`. Only catalog and setup problems fail here;
/// forecast failures are already part of the text.
fn build_report(config: &Config, now: DateTime<Utc>) -> anyhow::Result<String> {
    let spots = catalog::load(&config.catalog.path).context("loading spot catalog")?;
    info!(
        "📋 Loaded {} spots from {}",
        spots.len(),
        config.catalog.path.display()
    );

    let api_key = config
        .api_key()
        .ok_or_else(|| anyhow!("{} is not set", config.forecast.api_key_env))?;
    let client = OpenWeatherClient::new(&config.forecast, api_key)
        .context("building forecast client")?;

    Ok(report::generate(
        &config.report,
        &spots,
        &client,
        FetchBudget::new(config.forecast.fetch_quota),
        now,
    ))
}

/// Deliver the liveness message, then the report or an error summary.
/// Delivery failures are logged and never abort the run.
fn run(config: &Config, notifier: &dyn Notifier, now: DateTime<Utc>) {
    if let Err(e) = notifier.send(fallback::LIVENESS_MESSAGE) {
        error!("❌ Liveness message not delivered: {}", e);
    }

    let text = build_report(config, now).unwrap_or_else(|err| {
        // Still tell the chat what went wrong
        error!("❌ Report failed: {:#}", err);
        fallback::error_summary(&err, now)
    });

    if let Err(e) = notifier.send(&text) {
        error!("❌ Report not delivered: {}", e);
    }
}

/// Main application entry point.
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load();
    let notifier = notifier::from_config(&config);

    run(&config, notifier.as_ref(), Utc::now());
    info!("🏁 Run complete");
}
