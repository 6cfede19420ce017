//! # engine::feed
//!
//! **Feed Generator**: a bounded random-walk OHLC simulator with sparse
//! BUY/SELL annotations. It exists purely for visual effect; nothing here
//! models a real market.
//!
//! ## Per-tick flow
//! ```text
//! advance(now)
//!   │
//!   ├─ u > 0.9  (10%) → open a new candle at currentPrice
//!   │                   ├─ push into ring (evicts oldest), candleIndex += 1
//!   │                   └─ signal only if gap allows, body agrees with the
//!   │                      10-candle trend, and u > 0.6
//!   │
//!   └─ otherwise (90%) → nudge the last candle's close, re-tighten high/low
//! ```
//!
//! ## Draw order
//! Every candle consumes three draws (body step, upper wick, lower wick).
//! The signal gate, result and profit value are drawn only when reached, in
//! that order. A scripted [`RandomSource`] therefore reproduces exact output.
//!
//! Price is unbounded and may drift below zero over a long enough run.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, trace};

use crate::engine::ring::RingBuffer;
use crate::engine::rng::RandomSource;
use crate::models::{Candle, Side, TradeResult, TradeSignal};

// ─── Params ───────────────────────────────────────────────────────────────────

/// Tuning constants for the simulation.
///
/// Seeded history and live ticks use different constants: 70% vs 80% profit
/// bias, and only live ticks apply the trend filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedParams {
    /// Full width of the body step for seeded candles (`±seed_volatility / 2`).
    pub seed_volatility: f64,
    pub seed_wick:       f64,
    pub live_volatility: f64,
    pub live_wick:       f64,
    /// Full width of the close nudge applied to the in-progress candle.
    pub live_drift:      f64,

    pub new_candle_probability:  f64,
    /// Seeded candles at or below this index never carry a signal.
    pub warmup:                  u64,
    /// Two signals must be more than this many candles apart.
    pub min_signal_gap:          u64,
    pub seed_signal_probability: f64,
    pub live_signal_probability: f64,
    pub seed_profit_bias:        f64,
    pub live_profit_bias:        f64,
    /// Trend = latest close vs. the close this many candles from the end.
    pub trend_lookback:          usize,

    pub profit_min:  u32,
    pub profit_span: u32,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self {
            seed_volatility: 2.0,
            seed_wick:       0.5,
            live_volatility: 1.5,
            live_wick:       0.4,
            live_drift:      0.3,

            new_candle_probability:  0.10,
            warmup:                  15,
            min_signal_gap:          12,
            seed_signal_probability: 0.06,
            live_signal_probability: 0.40,
            seed_profit_bias:        0.70,
            live_profit_bias:        0.80,
            trend_lookback:          10,

            profit_min:  20,
            profit_span: 130,
        }
    }
}

// ─── Tick Outcome ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing to mutate (empty feed).
    Idle,
    /// A fresh candle was pushed; it may carry a signal.
    Opened(Candle),
    /// The in-progress candle moved.
    Updated(Candle),
}

// ─── Generator ────────────────────────────────────────────────────────────────

pub struct FeedGenerator<R> {
    params:            FeedParams,
    rng:               R,
    candles:           RingBuffer<Candle>,
    current_price:     f64,
    candle_index:      u64,
    last_signal_index: u64,
}

impl<R: RandomSource> FeedGenerator<R> {
    /// Build the feed and synthesize `history_length` candles ending at `now`.
    ///
    /// The ring capacity equals `history_length`; zero yields an empty feed
    /// whose ticks are no-ops.
    pub fn seed(
        initial_price:  f64,
        history_length: usize,
        params:         FeedParams,
        rng:            R,
        now:            DateTime<Utc>,
    ) -> Self {
        let mut feed = Self {
            params,
            rng,
            candles: RingBuffer::new(history_length),
            current_price: initial_price,
            candle_index: 0,
            last_signal_index: 0,
        };

        let mut price = initial_price;
        for i in 0..history_length {
            let index = i as u64;
            let time = now - Duration::seconds((history_length - i) as i64);
            let mut candle =
                feed.synthesize(index, time, price, params.seed_volatility, params.seed_wick);

            if index > params.warmup && feed.gap_allows(index) {
                if let Some(side) = candle.body_side() {
                    if feed.rng.next_f64() > 1.0 - params.seed_signal_probability {
                        feed.place_signal(&mut candle, side, params.seed_profit_bias);
                    }
                }
            }

            price = candle.close;
            feed.candles.push(candle);
        }

        feed.current_price = price;
        feed.candle_index = history_length as u64;

        debug!(
            history_length,
            initial_price,
            current_price = price,
            "Feed seeded"
        );
        feed
    }

    /// Apply one tick. See the module docs for the decision tree.
    pub fn advance(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.candles.is_empty() {
            return TickOutcome::Idle;
        }

        if self.rng.next_f64() > 1.0 - self.params.new_candle_probability {
            self.open_candle(now)
        } else {
            self.nudge_last()
        }
    }

    fn open_candle(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let params = self.params;

        let Some(last) = self.candles.last() else {
            return TickOutcome::Idle;
        };
        let recent_close = last.close;
        let last_time = last.time;
        let older_close = self
            .candles
            .nth_back(params.trend_lookback.saturating_sub(1))
            .map(|c| c.close)
            .unwrap_or(recent_close);

        // Candle times must stay strictly increasing even if the clock stalls.
        let time = if now > last_time {
            now
        } else {
            last_time + Duration::milliseconds(1)
        };

        let index = self.candle_index;
        let mut candle = self.synthesize(
            index,
            time,
            self.current_price,
            params.live_volatility,
            params.live_wick,
        );

        let trend = if recent_close > older_close {
            Some(Side::Buy)
        } else if recent_close < older_close {
            Some(Side::Sell)
        } else {
            None
        };

        if self.gap_allows(index) {
            if let (Some(side), Some(trend)) = (candle.body_side(), trend) {
                if side == trend && self.rng.next_f64() > 1.0 - params.live_signal_probability {
                    self.place_signal(&mut candle, side, params.live_profit_bias);
                }
            }
        }

        self.candle_index += 1;
        self.current_price = candle.close;
        self.candles.push(candle.clone());

        debug!(index, close = candle.close, "New candle opened");
        TickOutcome::Opened(candle)
    }

    fn nudge_last(&mut self) -> TickOutcome {
        let drift = (self.rng.next_f64() - 0.5) * self.params.live_drift;

        let Some(last) = self.candles.last_mut() else {
            return TickOutcome::Idle;
        };
        let close = last.close + drift;
        last.update_close(close);
        let updated = last.clone();

        self.current_price = close;
        trace!(index = updated.index, close, "Candle updated");
        TickOutcome::Updated(updated)
    }

    /// Three draws: body step, upper wick, lower wick.
    fn synthesize(
        &mut self,
        index:      u64,
        time:       DateTime<Utc>,
        open:       f64,
        volatility: f64,
        wick:       f64,
    ) -> Candle {
        let close = open + (self.rng.next_f64() - 0.5) * volatility;
        let wick_up = self.rng.next_f64() * wick;
        let wick_down = self.rng.next_f64() * wick;
        Candle::from_step(index, time, open, close, wick_up, wick_down)
    }

    #[inline]
    fn gap_allows(&self, index: u64) -> bool {
        index.saturating_sub(self.last_signal_index) > self.params.min_signal_gap
    }

    fn place_signal(&mut self, candle: &mut Candle, side: Side, profit_bias: f64) {
        let result = if self.rng.next_f64() > 1.0 - profit_bias {
            TradeResult::Profit
        } else {
            TradeResult::Loss
        };
        let profit_value =
            self.params.profit_min + (self.rng.next_f64() * f64::from(self.params.profit_span)) as u32;

        candle.signal = Some(TradeSignal {
            signal: side,
            result,
            profit_value,
        });
        self.last_signal_index = candle.index;

        info!(
            index = candle.index,
            side = ?side,
            result = ?result,
            profit_value,
            "📍 Signal placed"
        );
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    /// Visible candles, oldest first.
    pub fn candles(&self) -> impl Iterator<Item = &Candle> + '_ {
        self.candles.iter()
    }

    /// Owned copy of the visible sequence for readers that must release locks.
    pub fn snapshot(&self) -> Vec<Candle> {
        self.candles.to_vec()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn candle_index(&self) -> u64 {
        self.candle_index
    }

    pub fn last_signal_index(&self) -> u64 {
        self.last_signal_index
    }

    pub fn params(&self) -> &FeedParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::{ScriptedRandom, SystemRandom};

    fn signaled_indices<'a>(candles: impl Iterator<Item = &'a Candle>) -> Vec<u64> {
        candles.filter(|c| c.signal.is_some()).map(|c| c.index).collect()
    }

    #[test]
    fn test_flat_scenario_yields_identical_candles() {
        let rng = ScriptedRandom::cycle(vec![0.5, 0.0, 0.0]);
        let feed = FeedGenerator::seed(2000.0, 5, FeedParams::default(), rng, Utc::now());

        assert_eq!(feed.len(), 5);
        for c in feed.candles() {
            assert_eq!((c.open, c.high, c.low, c.close), (2000.0, 2000.0, 2000.0, 2000.0));
            assert!(c.signal.is_none());
        }
        assert_eq!(feed.current_price(), 2000.0);
        assert_eq!(feed.candle_index(), 5);
    }

    #[test]
    fn test_flat_candles_never_signal_past_warmup() {
        // Gate draws are skipped for directionless candles, so 0.5/0/0 repeats cleanly.
        let rng = ScriptedRandom::cycle(vec![0.5, 0.0, 0.0]);
        let feed = FeedGenerator::seed(2000.0, 60, FeedParams::default(), rng, Utc::now());
        assert!(signaled_indices(feed.candles()).is_empty());
    }

    #[test]
    fn test_seed_times_are_increasing() {
        let feed = FeedGenerator::seed(
            2000.0,
            30,
            FeedParams::default(),
            SystemRandom::seeded(3),
            Utc::now(),
        );
        let times: Vec<_> = feed.candles().map(|c| c.time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_saturated_gate_respects_signal_gap() {
        // 0.99 passes every gate: rising bodies, rising trend, profit results.
        let rng = ScriptedRandom::cycle(vec![0.99]);
        let mut feed = FeedGenerator::seed(2000.0, 100, FeedParams::default(), rng, Utc::now());

        assert_eq!(signaled_indices(feed.candles()), vec![16, 29, 42, 55, 68, 81, 94]);
        assert_eq!(feed.last_signal_index(), 94);

        let mut live = Vec::new();
        for _ in 0..21 {
            if let TickOutcome::Opened(c) = feed.advance(Utc::now()) {
                if let Some(signal) = c.signal {
                    assert_eq!(signal.signal, Side::Buy);
                    assert_eq!(signal.result, TradeResult::Profit);
                    assert_eq!(signal.profit_value, 148);
                    live.push(c.index);
                }
            }
        }
        assert_eq!(live, vec![107, 120]);
        assert_eq!(feed.len(), 100);
    }

    /// `history` candles below the warm-up, each drawn from `step`, then `live`.
    fn scripted(step: f64, history: usize, live: &[f64]) -> ScriptedRandom {
        let mut draws: Vec<f64> = (0..history).flat_map(|_| [step, 0.0, 0.0]).collect();
        draws.extend_from_slice(live);
        ScriptedRandom::cycle(draws)
    }

    fn open_live_candle(step: f64, body: f64) -> Candle {
        // 14 seeded candles keep every index under the warm-up while the gap
        // to the first live index (14) is already open.
        let rng = scripted(step, 14, &[0.95, body, 0.0, 0.0, 0.99, 0.99, 0.5]);
        let mut feed = FeedGenerator::seed(2000.0, 14, FeedParams::default(), rng, Utc::now());
        assert!(signaled_indices(feed.candles()).is_empty());

        match feed.advance(Utc::now()) {
            TickOutcome::Opened(c) => c,
            other => panic!("expected a new candle, got {other:?}"),
        }
    }

    #[test]
    fn test_live_signal_needs_trend_agreement() {
        // Rising history, falling candle: the gate is never consulted.
        let against = open_live_candle(0.9, 0.1);
        assert_eq!(against.index, 14);
        assert!(against.close < against.open);
        assert!(against.signal.is_none());

        // Flat history has no trend to agree with.
        let flat = open_live_candle(0.5, 0.1);
        assert!(flat.signal.is_none());

        // Falling history, falling candle: SELL, profit, 20 + 0.5 * 130.
        let with = open_live_candle(0.1, 0.1);
        let signal = with.signal.expect("trend-aligned candle should signal");
        assert_eq!(signal.signal, Side::Sell);
        assert_eq!(signal.result, TradeResult::Profit);
        assert_eq!(signal.profit_value, 85);
    }

    #[test]
    fn test_low_draws_only_nudge_last_candle() {
        let rng = ScriptedRandom::cycle(vec![0.01]);
        let mut feed = FeedGenerator::seed(2000.0, 20, FeedParams::default(), rng, Utc::now());
        let index_before = feed.candle_index();
        let last_index = feed.candles().last().map(|c| c.index);

        for _ in 0..50 {
            match feed.advance(Utc::now()) {
                TickOutcome::Updated(c) => {
                    assert!(c.is_consistent());
                    assert!(c.signal.is_none());
                    assert_eq!(Some(c.index), last_index);
                    assert_eq!(c.close, feed.current_price());
                }
                other => panic!("expected an update, got {other:?}"),
            }
        }
        assert_eq!(feed.candle_index(), index_before);
        assert_eq!(feed.len(), 20);
    }

    #[test]
    fn test_random_run_keeps_invariants() {
        for seed in 0..8 {
            let mut feed = FeedGenerator::seed(
                2000.0,
                100,
                FeedParams::default(),
                SystemRandom::seeded(seed),
                Utc::now(),
            );
            let mut all_signals = signaled_indices(feed.candles());
            let mut last_signal = feed.last_signal_index();

            for _ in 0..3_000 {
                if let TickOutcome::Opened(c) = feed.advance(Utc::now()) {
                    if c.signal.is_some() {
                        all_signals.push(c.index);
                    }
                }
                assert_eq!(feed.len(), 100);
                assert!(feed.last_signal_index() >= last_signal);
                last_signal = feed.last_signal_index();
                assert_eq!(feed.candles().last().map(|c| c.close), Some(feed.current_price()));
            }

            assert!(feed.candles().all(Candle::is_consistent));
            assert!(all_signals.windows(2).all(|w| w[1] - w[0] > 12));
            for c in feed.candles().filter(|c| c.signal.is_some()) {
                let value = c.profit_value().unwrap_or_default();
                assert!((20..150).contains(&value));
                assert!(c.result().is_some());
            }
            let indices: Vec<_> = feed.candles().map(|c| c.index).collect();
            assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }

    #[test]
    fn test_empty_feed_is_idle() {
        let rng = ScriptedRandom::cycle(vec![0.99]);
        let mut feed = FeedGenerator::seed(2000.0, 0, FeedParams::default(), rng, Utc::now());
        assert!(feed.is_empty());
        assert_eq!(feed.advance(Utc::now()), TickOutcome::Idle);
        assert_eq!(feed.current_price(), 2000.0);
        assert_eq!(feed.candle_index(), 0);
    }

    #[test]
    fn test_stalled_clock_still_advances_time() {
        let rng = ScriptedRandom::cycle(vec![0.99]);
        let start = Utc::now();
        let mut feed = FeedGenerator::seed(2000.0, 10, FeedParams::default(), rng, start);
        let frozen = start - Duration::seconds(60);
        for _ in 0..5 {
            feed.advance(frozen);
        }
        let times: Vec<_> = feed.candles().map(|c| c.time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}
