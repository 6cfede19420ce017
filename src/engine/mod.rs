//! # engine
//!
//! The live side of the chart: candle storage, randomness, the feed generator
//! and the host that ticks and renders it.

pub mod feed;
pub mod host;
pub mod ring;
pub mod rng;

pub use feed::{FeedGenerator, FeedParams, TickOutcome};
pub use host::{mount, ChartHandle, ChartParams, ChartStats, Viewport};
pub use rng::{RandomSource, ScriptedRandom, SystemRandom};
