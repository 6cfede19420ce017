//! # Helios XAU
//!
//! A synthetic XAU/USD candlestick feed with a live chart renderer.
//!
//! ```text
//!  ┌──────────────────┐  write lock / tick   ┌──────────────────────┐
//!  │  Feed task       │ ────────────────────▶│  ChartState          │
//!  │  (tick_interval) │                      │  RwLock<FeedGenerator│
//!  └──────────────────┘                      │    RingBuffer<Candle>│
//!           │ FeedEvent JSON                 └──────────────────────┘
//!           ▼                                           │ read lock / frame
//!  broadcast::Sender<String>                 ┌──────────────────────┐
//!                                            │  Frame task          │──▶ Surface
//!                                            │  (frame_interval)    │
//!                                            └──────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod render;
pub mod services;
pub mod state;

pub use config::Config;
pub use engine::{mount, ChartHandle, ChartParams};
pub use error::ChartError;
