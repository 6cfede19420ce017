//! # engine::host
//!
//! Mounts a chart: seeds the feed, then drives two periodic tasks on the tokio
//! runtime until the returned [`ChartHandle`] is stopped or dropped.
//!
//! ```text
//!  mount(params, rng, surface)
//!    │
//!    ├─ feed task   every tick_interval   write lock → advance → broadcast
//!    │
//!    └─ frame task  every frame_interval  apply viewport → read lock →
//!                                         snapshot → render_frame
//! ```
//!
//! `mount` must be called from within a tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::engine::feed::{FeedGenerator, FeedParams};
use crate::engine::rng::RandomSource;
use crate::error::ChartError;
use crate::events::FeedEvent;
use crate::models::Candle;
use crate::render::chart::ChartRenderer;
use crate::render::layout::clamp_dimension;
use crate::render::surface::Surface;
use crate::state::{build_state, SharedState};

/// Lower bound for both periods; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

// ─── Params ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartParams {
    pub initial_price:  f64,
    pub width:          f64,
    pub height:         f64,
    pub history_length: usize,
    pub tick_interval:  Duration,
    pub frame_interval: Duration,
    pub feed:           FeedParams,
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            initial_price:  2000.0,
            width:          800.0,
            height:         400.0,
            history_length: 100,
            tick_interval:  Duration::from_millis(100),
            frame_interval: Duration::from_millis(16),
            feed:           FeedParams::default(),
        }
    }
}

/// Requested surface size, applied by the frame task before its next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width:  f64,
    pub height: f64,
}

impl Viewport {
    /// Edges are clamped to `0..=MAX_DIMENSION`; non-finite values become 0.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: clamp_dimension(width), height: clamp_dimension(height) }
    }
}

/// Final counters and candles returned by [`ChartHandle::stop`].
#[derive(Debug, Clone)]
pub struct ChartStats {
    pub ticks:   u64,
    pub frames:  u64,
    pub candles: Vec<Candle>,
}

// ─── Mount ────────────────────────────────────────────────────────────────────

/// Seed the feed and start ticking and rendering.
///
/// Without a surface nothing is seeded or spawned.
pub fn mount(
    params:  ChartParams,
    rng:     Box<dyn RandomSource>,
    surface: Option<Box<dyn Surface>>,
) -> Result<ChartHandle, ChartError> {
    let Some(mut surface) = surface else {
        warn!("Chart mount skipped: no drawing surface");
        return Err(ChartError::SurfaceUnavailable);
    };
    let viewport = Viewport::new(params.width, params.height);
    surface.resize(viewport.width, viewport.height);

    let feed = FeedGenerator::seed(
        params.initial_price,
        params.history_length,
        params.feed,
        rng,
        Utc::now(),
    );
    let current_price = feed.current_price();
    let state = build_state(feed);

    let (viewport_tx, viewport_rx) = watch::channel(viewport);

    let feed_task = tokio::spawn(run_feed(Arc::clone(&state), params.tick_interval.max(MIN_PERIOD)));
    let frame_task = tokio::spawn(run_frames(
        Arc::clone(&state),
        surface,
        ChartRenderer::default(),
        viewport_rx,
        params.frame_interval.max(MIN_PERIOD),
    ));

    info!(
        history_length = params.history_length,
        current_price,
        width          = viewport.width,
        height         = viewport.height,
        tick_interval  = ?params.tick_interval,
        frame_interval = ?params.frame_interval,
        "🚀 Chart mounted"
    );

    Ok(ChartHandle { state, viewport_tx, feed_task, frame_task })
}

// ─── Tasks ────────────────────────────────────────────────────────────────────

async fn run_feed(state: SharedState, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the seeded history is the t=0 state.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let outcome = {
            let mut feed = state.feed.write().await;
            feed.advance(Utc::now())
        };
        let tick = state.tick_count.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(event) = FeedEvent::from_outcome(&outcome) {
            state.broadcast(&event);
        }
        trace!(tick, "Feed tick");
    }
}

async fn run_frames(
    state:           SharedState,
    mut surface:     Box<dyn Surface>,
    renderer:        ChartRenderer,
    mut viewport_rx: watch::Receiver<Viewport>,
    period:          Duration,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let viewport = *viewport_rx.borrow_and_update();
        if surface.size() != (viewport.width, viewport.height) {
            surface.resize(viewport.width, viewport.height);
            debug!(width = viewport.width, height = viewport.height, "Surface resized");
        }

        let candles = state.snapshot().await;
        let stats = renderer.render_frame(surface.as_mut(), &candles, Utc::now().timestamp_millis());
        let frame = state.frame_count.fetch_add(1, Ordering::Relaxed) + 1;

        trace!(frame, candles = stats.candles, signals = stats.signals, "Frame rendered");
    }
}

// ─── Handle ───────────────────────────────────────────────────────────────────

/// Owner of a mounted chart. Dropping it tears the chart down.
pub struct ChartHandle {
    state:       SharedState,
    viewport_tx: watch::Sender<Viewport>,
    feed_task:   JoinHandle<()>,
    frame_task:  JoinHandle<()>,
}

impl ChartHandle {
    /// Ordered snapshot of the visible candles, oldest first.
    pub async fn candles(&self) -> Vec<Candle> {
        self.state.snapshot().await
    }

    pub async fn current_price(&self) -> f64 {
        self.state.current_price().await
    }

    /// Receive every subsequent [`FeedEvent`] as JSON.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.state.events_tx.subscribe()
    }

    /// Ask the frame task to resize the surface before its next frame.
    pub fn resize(&self, width: f64, height: f64) {
        self.viewport_tx.send_replace(Viewport::new(width, height));
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport_tx.borrow()
    }

    pub fn tick_count(&self) -> u64 {
        self.state.ticks()
    }

    pub fn frame_count(&self) -> u64 {
        self.state.frames()
    }

    /// Live tick counter, still readable after the handle is gone.
    pub fn tick_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.state.tick_count)
    }

    pub fn frame_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.state.frame_count)
    }

    /// Cancel both tasks and wait until they are gone.
    pub async fn stop(mut self) -> ChartStats {
        self.feed_task.abort();
        self.frame_task.abort();
        // Cancellation surfaces as a JoinError; nothing else can end these loops.
        let _ = (&mut self.feed_task).await;
        let _ = (&mut self.frame_task).await;

        let stats = ChartStats {
            ticks:   self.state.ticks(),
            frames:  self.state.frames(),
            candles: self.state.snapshot().await,
        };
        self.state.broadcast(&FeedEvent::Stopped { ticks: stats.ticks, frames: stats.frames });

        info!(ticks = stats.ticks, frames = stats.frames, "🛑 Chart stopped");
        stats
    }
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.feed_task.abort();
        self.frame_task.abort();
    }
}
