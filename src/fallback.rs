//! # Fallback Messages
//!
//! Messages sent when there is no report to deliver. A run must never end
//! silently: if the report cannot be built (missing catalog, malformed row,
//! missing API key), the chat receives an error summary instead.
//!
//! The liveness message goes out before any report work, so a broken
//! deployment is visible even when nothing else reaches the chat.

use chrono::{DateTime, Utc};

/// Sent at startup, independent of report success and of the run mode
pub const LIVENESS_MESSAGE: &str = "✅ Kite Alert Bot is up, building the wind report…";

/// Summarize a report failure, including the error's cause chain.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use kite_alert_lib::fallback::error_summary;
///
/// let err = anyhow::anyhow!("line 3: unknown compass direction 'ENE'")
///     .context("loading spot catalog");
/// let now = Utc.with_ymd_and_hms(2025, 10, 18, 7, 0, 0).unwrap();
///
/// let text = error_summary(&err, now);
/// assert!(text.contains("loading spot catalog"));
/// assert!(text.contains("unknown compass direction 'ENE'"));
/// ```
pub fn error_summary(error: &anyhow::Error, now: DateTime<Utc>) -> String {
    let mut text = format!(
        "⚠️ Kite Alert: no report for {} UTC\n\n{}",
        now.format("%a %d %b %H:%M"),
        error
    );
    for cause in error.chain().skip(1) {
        text.push_str("\n↳ ");
        text.push_str(&cause.to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_liveness_names_no_day() {
        // Evening runs report tomorrow, morning runs today
        for day in ["today", "tomorrow"] {
            assert!(!LIVENESS_MESSAGE.contains(day));
        }
    }

    #[test]
    fn test_summary_lists_cause_chain() {
        let err = anyhow::anyhow!("cannot open catalog spots.csv")
            .context("loading spot catalog")
            .context("building report");
        let now = Utc.with_ymd_and_hms(2025, 10, 18, 7, 5, 0).unwrap();

        assert_eq!(
            error_summary(&err, now),
            "⚠️ Kite Alert: no report for Sat 18 Oct 07:05 UTC\n\n\
             building report\n\
             ↳ loading spot catalog\n\
             ↳ cannot open catalog spots.csv"
        );
    }

    #[test]
    fn test_summary_without_causes() {
        let err = anyhow::anyhow!("OWM_API_KEY not set");
        let now = Utc.with_ymd_and_hms(2025, 10, 18, 19, 0, 0).unwrap();

        let text = error_summary(&err, now);
        assert!(text.ends_with("\n\nOWM_API_KEY not set"));
        assert!(!text.contains('↳'));
    }
}
