//! # Helios: synthetic XAU chart demo
//!
//! Mounts the chart onto a headless SVG surface, streams feed events to the
//! log for a while, then writes the last frame to disk.
//!
//! ## Environment Variables
//!
//! | Variable            | Default                     | Description                      |
//! |---------------------|-----------------------------|----------------------------------|
//! | `INITIAL_PRICE`     | `2000`                      | Seed price                       |
//! | `CHART_WIDTH`       | `800`                       | Surface width (px)               |
//! | `CHART_HEIGHT`      | `400`                       | Surface height (px)              |
//! | `HISTORY_LENGTH`    | `100`                       | Visible candles                  |
//! | `TICK_INTERVAL_MS`  | `100`                       | Feed tick period                 |
//! | `FRAME_INTERVAL_MS` | `16`                        | Render period                    |
//! | `FEED_SEED`         | unset                       | Reproducible feed                |
//! | `RUN_SECS`          | `10`                        | Run length, `0` = until Ctrl-C   |
//! | `SNAPSHOT_PATH`     | `chart.svg`                 | Final frame output               |
//! | `RATE_API_URL`      | CoinGecko `simple/price`    | USDT/IDR source                  |
//! | `TRIAL_ENDS_AT`     | `2026-02-27T00:30:00+08:00` | Countdown target                 |
//! | `INVESTMENT`        | `600`                       | Calculator input                 |
//! | `CENT_ACCOUNT`      | `false`                     | Calculator in USC                |
//! | `RUST_LOG`          | `helios=debug`              | Tracing filter                   |

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use helios::engine::rng::{RandomSource, SystemRandom};
use helios::engine::mount;
use helios::render::{ChartRenderer, SvgSurface};
use helios::services::calculator::{Projection, EXPECTED_PAYOFF, RISK_REWARD, WIN_RATE_PCT};
use helios::services::countdown;
use helios::services::pricing::PLANS;
use helios::services::rates::{self, format_idr, RateQuote};
use helios::Config;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional) ──────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("helios=debug".parse()?))
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        HELIOS — XAU/USD Synthetic Feed        ║
  ║        Candles · Signals · Live Render        ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Config ────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;

    // ── 4. Page services ─────────────────────────────────────────────────────
    let client = reqwest::Client::new();
    let quote = rates::fetch_usdt_idr_rate(&client, &config.rate_api_url).await;
    info!(rate = quote.rate, source = ?quote.source, "USDT/IDR");

    let left = countdown::remaining(config.trial_ends_at, Utc::now());
    info!(
        ends_at   = %config.trial_ends_at,
        remaining = %countdown::format_hms(left),
        "⏳ Trial countdown"
    );

    let projection = Projection::new(config.investment, config.account);
    info!(
        investment = %config.account.format(config.investment),
        tier       = ?projection.tier,
        daily      = %projection.display(projection.daily),
        weekly     = %projection.display(projection.weekly),
        monthly    = %projection.display(projection.monthly),
        win_rate   = WIN_RATE_PCT,
        payoff     = EXPECTED_PAYOFF,
        risk_reward = RISK_REWARD,
        "📊 {}",
        projection.tier.message(config.account)
    );

    for plan in PLANS.iter() {
        debug!(
            plan     = %plan.title(),
            price    = %plan.price_label(),
            discount = ?plan.discount_pct,
            popular  = plan.popular,
            "Subscription plan"
        );
    }

    // ── 5. Mount the chart ───────────────────────────────────────────────────
    let rng: Box<dyn RandomSource> = match config.feed_seed {
        Some(seed) => Box::new(SystemRandom::seeded(seed)),
        None => Box::new(SystemRandom::from_entropy()),
    };
    let params = config.chart_params();
    let surface = SvgSurface::new(params.width, params.height);
    let handle = mount(params, rng, Some(Box::new(surface))).context("Failed to mount chart")?;

    let events = tokio::spawn(log_events(handle.subscribe(), quote));

    // ── 6. Run ───────────────────────────────────────────────────────────────
    match config.run_for {
        Some(duration) => {
            info!(?duration, "Running (Ctrl-C to stop early)");
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = tokio::signal::ctrl_c() => info!("Ctrl-C received"),
            }
        }
        None => {
            info!("Running until Ctrl-C");
            tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
        }
    }

    // ── 7. Teardown + snapshot ───────────────────────────────────────────────
    let stats = handle.stop().await;
    events.abort();

    let mut snapshot = SvgSurface::new(params.width, params.height);
    ChartRenderer::default().render_frame(&mut snapshot, &stats.candles, Utc::now().timestamp_millis());
    snapshot
        .write_to(&config.snapshot_path)
        .with_context(|| format!("Failed to write {}", config.snapshot_path.display()))?;

    Ok(())
}

/// Mirror feed events into the log until the channel closes.
async fn log_events(mut rx: broadcast::Receiver<String>, quote: RateQuote) {
    loop {
        let json = match rx.recv().await {
            Ok(json) => json,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event log lagging");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let Ok(event) = serde_json::from_str::<Value>(&json) else {
            continue;
        };
        match event["event"].as_str() {
            Some("SIGNAL_PLACED") => {
                let usd = event["candle"]["profitValue"].as_f64().unwrap_or(0.0);
                info!(
                    index  = %event["candle"]["index"],
                    signal = %event["candle"]["signal"],
                    result = %event["candle"]["result"],
                    usd,
                    idr    = %format_idr(quote.usd_to_idr(usd)),
                    "🔔 Signal"
                );
            }
            Some(kind) => debug!(event = kind, "Feed event"),
            None => {}
        }
    }
}
