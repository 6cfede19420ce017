//! # services::rates
//!
//! USDT → IDR conversion rate from CoinGecko, used to show profit labels in
//! rupiah. The lookup never fails from the caller's point of view: any
//! problem is logged and replaced by [`FALLBACK_RATE`].
//!
//! Expected body: `{ "tether": { "idr": 16791.6 } }`

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ChartError;
use crate::services::group_digits;

pub const FALLBACK_RATE: f64 = 16_700.0;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateQuote {
    /// IDR per USDT.
    pub rate:   f64,
    pub source: RateSource,
}

impl RateQuote {
    pub fn fallback() -> Self {
        Self { rate: FALLBACK_RATE, source: RateSource::Fallback }
    }

    #[inline]
    pub fn usd_to_idr(&self, usd: f64) -> f64 {
        usd * self.rate
    }
}

/// Pull `tether.idr` out of a CoinGecko `simple/price` body.
pub fn parse_rate(body: &Value) -> Result<f64, ChartError> {
    let rate = body
        .pointer("/tether/idr")
        .and_then(Value::as_f64)
        .ok_or_else(|| ChartError::Rate(format!("unexpected response shape: {body}")))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(ChartError::Rate(format!("unusable rate {rate}")));
    }
    Ok(rate)
}

async fn request_rate(client: &reqwest::Client, url: &str) -> Result<f64, ChartError> {
    let body: Value = client
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    parse_rate(&body)
}

/// Current USDT/IDR rate, or [`FALLBACK_RATE`] on any failure.
pub async fn fetch_usdt_idr_rate(client: &reqwest::Client, url: &str) -> RateQuote {
    match request_rate(client, url).await {
        Ok(rate) => {
            info!(rate, "💱 USDT/IDR rate fetched");
            RateQuote { rate, source: RateSource::Live }
        }
        Err(e) => {
            warn!(error = %e, fallback = FALLBACK_RATE, "⚠️ Rate lookup failed, using fallback");
            RateQuote::fallback()
        }
    }
}

/// Rupiah display form: `599000.0` → `Rp 599.000`. Rounds to whole rupiah.
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}Rp {}", group_digits(rounded.abs() as u64, '.'))
}
