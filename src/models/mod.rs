//! Domain models shared across the feed, the renderer and the host.

pub mod candle;

pub use candle::{Candle, Side, TradeResult, TradeSignal};
