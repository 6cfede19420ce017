//! # events
//!
//! Defines [`FeedEvent`], every event the chart host broadcasts while it runs.
//!
//! Events travel over `tokio::sync::broadcast::Sender<String>` as
//! pre-serialised JSON, so subscribers never need `Candle: Clone` bounds on
//! the channel and a lagging or absent subscriber costs nothing.

use serde::Serialize;

use crate::engine::feed::TickOutcome;
use crate::models::Candle;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEvent {
    /// A fresh candle was pushed without an annotation.
    CandleOpened {
        candle: Box<Candle>,
    },

    /// A fresh candle was pushed and carries a BUY/SELL signal.
    SignalPlaced {
        candle: Box<Candle>,
    },

    /// The in-progress candle moved.
    CandleUpdated {
        candle: Box<Candle>,
    },

    /// Host torn down.
    Stopped {
        ticks:  u64,
        frames: u64,
    },
}

impl FeedEvent {
    /// Event for one tick, `None` when the tick changed nothing.
    pub fn from_outcome(outcome: &TickOutcome) -> Option<Self> {
        match outcome {
            TickOutcome::Idle => None,
            TickOutcome::Opened(candle) if candle.signal.is_some() => {
                Some(FeedEvent::SignalPlaced { candle: Box::new(candle.clone()) })
            }
            TickOutcome::Opened(candle) => {
                Some(FeedEvent::CandleOpened { candle: Box::new(candle.clone()) })
            }
            TickOutcome::Updated(candle) => {
                Some(FeedEvent::CandleUpdated { candle: Box::new(candle.clone()) })
            }
        }
    }

    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
