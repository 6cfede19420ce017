//! # config
//!
//! Runtime configuration read from environment variables (after `dotenvy`
//! has loaded `.env`). Every variable is optional; a present but malformed
//! value is a [`ChartError::Config`] naming the variable.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::engine::feed::FeedParams;
use crate::engine::host::ChartParams;
use crate::error::ChartError;
use crate::services::calculator::AccountKind;
use crate::services::countdown;

pub const DEFAULT_RATE_API_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=tether&vs_currencies=idr";
pub const DEFAULT_TRIAL_ENDS_AT: &str = "2026-02-27T00:30:00+08:00";

#[derive(Debug, Clone)]
pub struct Config {
    // ── Chart ────────────────────────────────────────────────────────────────
    pub initial_price:  f64,
    pub chart_width:    f64,
    pub chart_height:   f64,
    pub history_length: usize,
    pub tick_interval:  Duration,
    pub frame_interval: Duration,
    /// `None` = seed from OS entropy.
    pub feed_seed:      Option<u64>,

    // ── Demo run ─────────────────────────────────────────────────────────────
    /// `None` = run until Ctrl-C.
    pub run_for:        Option<Duration>,
    pub snapshot_path:  PathBuf,

    // ── Page services ────────────────────────────────────────────────────────
    pub rate_api_url:   String,
    pub trial_ends_at:  DateTime<FixedOffset>,
    pub investment:     f64,
    pub account:        AccountKind,
}

impl Config {
    pub fn from_env() -> Result<Self, ChartError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. Tests pass a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let initial_price: f64 = parse_or(&lookup, "INITIAL_PRICE", 2000.0)?;
        if !initial_price.is_finite() {
            return Err(ChartError::config("INITIAL_PRICE", "must be a finite number"));
        }

        let chart_width: f64 = parse_or(&lookup, "CHART_WIDTH", 800.0)?;
        let chart_height: f64 = parse_or(&lookup, "CHART_HEIGHT", 400.0)?;
        for (key, value) in [("CHART_WIDTH", chart_width), ("CHART_HEIGHT", chart_height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::config(key, "must be a non-negative number"));
            }
        }

        let tick_ms: u64 = parse_or(&lookup, "TICK_INTERVAL_MS", 100)?;
        let frame_ms: u64 = parse_or(&lookup, "FRAME_INTERVAL_MS", 16)?;
        for (key, value) in [("TICK_INTERVAL_MS", tick_ms), ("FRAME_INTERVAL_MS", frame_ms)] {
            if value == 0 {
                return Err(ChartError::config(key, "must be greater than zero"));
            }
        }

        let run_secs: u64 = parse_or(&lookup, "RUN_SECS", 10)?;

        let trial_raw = lookup("TRIAL_ENDS_AT").unwrap_or_else(|| DEFAULT_TRIAL_ENDS_AT.to_string());
        let trial_ends_at = countdown::parse_target(trial_raw.trim())
            .map_err(|e| ChartError::config("TRIAL_ENDS_AT", format!("{trial_raw:?}: {e}")))?;

        let investment: f64 = parse_or(&lookup, "INVESTMENT", 600.0)?;
        if !investment.is_finite() {
            return Err(ChartError::config("INVESTMENT", "must be a finite number"));
        }

        let account = if parse_flag(&lookup, "CENT_ACCOUNT")? {
            AccountKind::Cent
        } else {
            AccountKind::Standard
        };

        Ok(Self {
            initial_price,
            chart_width,
            chart_height,
            history_length: parse_or(&lookup, "HISTORY_LENGTH", 100)?,
            tick_interval:  Duration::from_millis(tick_ms),
            frame_interval: Duration::from_millis(frame_ms),
            feed_seed:      parse_opt(&lookup, "FEED_SEED")?,
            run_for:        (run_secs > 0).then(|| Duration::from_secs(run_secs)),
            snapshot_path:  lookup("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("chart.svg")),
            rate_api_url:   lookup("RATE_API_URL")
                .unwrap_or_else(|| DEFAULT_RATE_API_URL.to_string()),
            trial_ends_at,
            investment,
            account,
        })
    }

    /// Mount parameters for the chart host.
    pub fn chart_params(&self) -> ChartParams {
        ChartParams {
            initial_price:  self.initial_price,
            width:          self.chart_width,
            height:         self.chart_height,
            history_length: self.history_length,
            tick_interval:  self.tick_interval,
            frame_interval: self.frame_interval,
            feed:           FeedParams::default(),
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn parse_opt<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ChartError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ChartError::config(key, format!("{raw:?}: {e}"))),
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ChartError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ChartError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(ChartError::config(key, format!("{other:?} is not a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ChartError> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.initial_price, 2000.0);
        assert_eq!(config.history_length, 100);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert_eq!(config.feed_seed, None);
        assert_eq!(config.run_for, Some(Duration::from_secs(10)));
        assert_eq!(config.snapshot_path, PathBuf::from("chart.svg"));
        assert_eq!(config.rate_api_url, DEFAULT_RATE_API_URL);
        assert_eq!(config.account, AccountKind::Standard);
        assert_eq!(config.trial_ends_at.to_rfc3339(), "2026-02-27T00:30:00+08:00");

        let params = config.chart_params();
        assert_eq!((params.width, params.height), (800.0, 400.0));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("INITIAL_PRICE", "2350.5"),
            ("HISTORY_LENGTH", "5"),
            ("FEED_SEED", " 42 "),
            ("RUN_SECS", "0"),
            ("CENT_ACCOUNT", "true"),
        ])
        .unwrap();
        assert_eq!(config.initial_price, 2350.5);
        assert_eq!(config.history_length, 5);
        assert_eq!(config.feed_seed, Some(42));
        assert_eq!(config.run_for, None);
        assert_eq!(config.account, AccountKind::Cent);
    }

    #[test]
    fn test_malformed_value_names_the_variable() {
        let err = config_from(&[("HISTORY_LENGTH", "lots")]).unwrap_err();
        assert!(matches!(err, ChartError::Config { key: "HISTORY_LENGTH", .. }));

        let err = config_from(&[("TICK_INTERVAL_MS", "0")]).unwrap_err();
        assert!(matches!(err, ChartError::Config { key: "TICK_INTERVAL_MS", .. }));

        let err = config_from(&[("CENT_ACCOUNT", "maybe")]).unwrap_err();
        assert!(matches!(err, ChartError::Config { key: "CENT_ACCOUNT", .. }));

        let err = config_from(&[("TRIAL_ENDS_AT", "tomorrow")]).unwrap_err();
        assert!(matches!(err, ChartError::Config { key: "TRIAL_ENDS_AT", .. }));
    }
}
