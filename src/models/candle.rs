//! # models::candle
//!
//! Defines [`Candle`], one time-bucketed OHLC observation of the synthetic
//! XAU feed, together with the optional [`TradeSignal`] annotation the chart
//! draws as a BUY/SELL marker and a floating profit/loss label.
//!
//! `signal`, `result` and `profitValue` travel together in one `Option`, so a
//! result never exists without its signal. The JSON form flattens them into
//! three loose optional fields for consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Side ─────────────────────────────────────────────────────────────────────

/// Direction of an annotated trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Marker caption drawn next to the triangle.
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

// ─── TradeResult ──────────────────────────────────────────────────────────────

/// Outcome shown for a signaled candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Profit,
    Loss,
}

// ─── TradeSignal ──────────────────────────────────────────────────────────────

/// A buy/sell annotation with its paired result and USD magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    pub signal: Side,
    pub result: TradeResult,
    /// Positive USD magnitude of the outcome.
    pub profit_value: u32,
}

impl TradeSignal {
    /// Floating label text, e.g. `+120usd` or `-45usd`.
    pub fn label_text(&self) -> String {
        match self.result {
            TradeResult::Profit => format!("+{}usd", self.profit_value),
            TradeResult::Loss => format!("-{}usd", self.profit_value),
        }
    }
}

// ─── Candle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Position in the stream of all candles ever produced (0-based).
    /// Survives ring-buffer eviction, so it doubles as a stable identity.
    pub index: u64,
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(flatten)]
    pub signal: Option<TradeSignal>,
}

impl Candle {
    /// Build a candle from one random-walk step.
    ///
    /// The body spans `open..close`; `wick_up` / `wick_down` extend it, so the
    /// OHLC invariant holds for any non-negative wick lengths.
    pub fn from_step(
        index: u64,
        time: DateTime<Utc>,
        open: f64,
        close: f64,
        wick_up: f64,
        wick_down: f64,
    ) -> Self {
        Self {
            index,
            time,
            open,
            high: open.max(close) + wick_up,
            low: open.min(close) - wick_down,
            close,
            signal: None,
        }
    }

    /// Move the close of an in-progress candle and re-tighten the range.
    pub fn update_close(&mut self, close: f64) {
        self.close = close;
        self.high = self.high.max(close);
        self.low = self.low.min(close);
    }

    /// Colour key for rendering. A flat candle counts as bullish.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Body direction used for signal placement.
    ///
    /// Returns `None` for a flat candle: it has no direction to agree with a
    /// trend, so it never carries a signal.
    pub fn body_side(&self) -> Option<Side> {
        if self.close > self.open {
            Some(Side::Buy)
        } else if self.close < self.open {
            Some(Side::Sell)
        } else {
            None
        }
    }

    /// `low ≤ min(open, close)` and `high ≥ max(open, close)`.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    pub fn result(&self) -> Option<TradeResult> {
        self.signal.map(|s| s.result)
    }

    pub fn profit_value(&self) -> Option<u32> {
        self.signal.map(|s| s.profit_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64) -> Candle {
        Candle::from_step(0, Utc::now(), open, close, 0.25, 0.5)
    }

    #[test]
    fn test_from_step_extends_body() {
        let c = candle(2000.0, 2001.0);
        assert_eq!(c.high, 2001.25);
        assert_eq!(c.low, 1999.5);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_update_close_retightens_range() {
        let mut c = candle(2000.0, 2001.0);
        c.update_close(2005.0);
        assert_eq!(c.high, 2005.0);
        c.update_close(1990.0);
        assert_eq!(c.low, 1990.0);
        assert_eq!(c.high, 2005.0);
        assert!(c.is_consistent());
    }

    #[test]
    fn test_flat_candle_is_bullish_but_directionless() {
        let c = candle(2000.0, 2000.0);
        assert!(c.is_bullish());
        assert_eq!(c.body_side(), None);
        assert_eq!(candle(2000.0, 1999.0).body_side(), Some(Side::Sell));
        assert_eq!(candle(2000.0, 2001.0).body_side(), Some(Side::Buy));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let mut c = candle(2000.0, 2001.0);
        let plain = serde_json::to_value(&c).unwrap();
        assert!(plain.get("signal").is_none());
        assert!(plain.get("profitValue").is_none());

        c.signal = Some(TradeSignal {
            signal: Side::Buy,
            result: TradeResult::Profit,
            profit_value: 120,
        });
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["signal"], "buy");
        assert_eq!(json["result"], "profit");
        assert_eq!(json["profitValue"], 120);
    }

    #[test]
    fn test_json_reads_back_into_candle() {
        let mut c = candle(2000.0, 2001.0);
        let plain: Candle = serde_json::from_value(serde_json::to_value(&c).unwrap()).unwrap();
        assert_eq!(plain, c);
        assert!(plain.signal.is_none());

        c.signal = Some(TradeSignal { signal: Side::Sell, result: TradeResult::Loss, profit_value: 45 });
        let signaled: Candle = serde_json::from_value(serde_json::to_value(&c).unwrap()).unwrap();
        assert_eq!(signaled, c);

        // A signal without its result is not a signal.
        let mut partial = serde_json::to_value(&c).unwrap();
        partial.as_object_mut().unwrap().remove("result");
        let partial: Candle = serde_json::from_value(partial).unwrap();
        assert!(partial.signal.is_none());
        assert_eq!(partial.close, 2001.0);
    }

    #[test]
    fn test_label_text_carries_sign() {
        let win = TradeSignal { signal: Side::Sell, result: TradeResult::Profit, profit_value: 42 };
        let loss = TradeSignal { result: TradeResult::Loss, ..win };
        assert_eq!(win.label_text(), "+42usd");
        assert_eq!(loss.label_text(), "-42usd");
    }
}
