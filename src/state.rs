//! # state
//!
//! Shared state of a mounted chart: the single source of truth that the feed
//! task (writes) and the frame task (reads) share.
//!
//! * `RwLock<FeedGenerator>` gives the frame task concurrent read access while
//!   the feed task takes the lock exclusively for one whole tick, so a frame
//!   never observes a half-updated candle.
//! * The lock is `tokio::sync::RwLock`; neither side blocks an OS thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::engine::feed::FeedGenerator;
use crate::engine::rng::RandomSource;
use crate::events::FeedEvent;
use crate::models::Candle;

/// Buffered events per subscriber before it starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The feed as mounted: randomness is chosen at runtime.
pub type MountedFeed = FeedGenerator<Box<dyn RandomSource>>;

// ─── ChartState ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ChartState {
    // ── Feed ─────────────────────────────────────────────────────────────────
    pub feed: Arc<RwLock<MountedFeed>>,

    // ── Events ───────────────────────────────────────────────────────────────
    /// Pre-serialised [`FeedEvent`] JSON.
    pub events_tx: broadcast::Sender<String>,

    // ── Metrics ──────────────────────────────────────────────────────────────
    pub tick_count:  Arc<AtomicU64>,
    pub frame_count: Arc<AtomicU64>,
}

impl ChartState {
    pub fn new(feed: MountedFeed) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            feed:        Arc::new(RwLock::new(feed)),
            events_tx,
            tick_count:  Arc::new(AtomicU64::new(0)),
            frame_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish to every subscriber. No subscriber is not an error.
    pub fn broadcast(&self, event: &FeedEvent) {
        let _ = self.events_tx.send(event.to_json());
    }

    /// Ordered copy of the visible candles; the read lock is released on return.
    pub async fn snapshot(&self) -> Vec<Candle> {
        self.feed.read().await.snapshot()
    }

    pub async fn current_price(&self) -> f64 {
        self.feed.read().await.current_price()
    }

    pub fn ticks(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    pub fn frames(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }
}

pub type SharedState = Arc<ChartState>;

pub fn build_state(feed: MountedFeed) -> SharedState {
    Arc::new(ChartState::new(feed))
}
