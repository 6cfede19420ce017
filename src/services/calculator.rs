//! # services::calculator
//!
//! Investment projection shown next to the chart. Daily profit uses the
//! midpoint of the advertised 1.5%–5% band; weekly and monthly figures scale
//! it by trading days. Below the account's minimum equity no projection is
//! shown at all.

use serde::Serialize;

use crate::services::group_digits;

// ─── Constants ────────────────────────────────────────────────────────────────

pub const WIN_RATE_PCT: f64 = 74.62;
pub const EXPECTED_PAYOFF: f64 = 0.72;
pub const RISK_REWARD: &str = "1 : 1.8";
pub const DAILY_PROFIT_MIN_PCT: f64 = 1.5;
pub const DAILY_PROFIT_MAX_PCT: f64 = 5.0;
/// 3.25% as a fraction.
pub const AVG_DAILY_RATE: f64 = (DAILY_PROFIT_MIN_PCT + DAILY_PROFIT_MAX_PCT) / 2.0 / 100.0;
pub const TRADING_DAYS_PER_WEEK: f64 = 5.0;
pub const TRADING_DAYS_PER_MONTH: f64 = 22.0;

/// Shown in place of a hidden projection.
pub const HIDDEN: &str = "—";

// ─── Account ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// USD account.
    Standard,
    /// Cent account, amounts in USC.
    Cent,
}

impl AccountKind {
    pub fn min_equity(self) -> f64 {
        match self {
            AccountKind::Standard => 200.0,
            AccountKind::Cent => 20_000.0,
        }
    }

    pub fn recommended_equity(self) -> f64 {
        match self {
            AccountKind::Standard => 600.0,
            AccountKind::Cent => 60_000.0,
        }
    }

    /// `$1,234.56` for standard, `1,234.5 USC` for cent (up to two decimals).
    pub fn format(self, value: f64) -> String {
        let cents = (value.abs() * 100.0).round() as u64;
        let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
        let whole = group_digits(cents / 100, ',');
        let frac = cents % 100;

        match self {
            AccountKind::Standard => format!("{sign}${whole}.{frac:02}"),
            AccountKind::Cent => {
                let frac = format!("{frac:02}");
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() {
                    format!("{sign}{whole} USC")
                } else {
                    format!("{sign}{whole}.{frac} USC")
                }
            }
        }
    }
}

// ─── Tier ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityTier {
    BelowMinimum,
    MinimumMet,
    /// At or above the recommended equity.
    Fortified,
}

impl EquityTier {
    pub fn classify(investment: f64, account: AccountKind) -> Self {
        if investment < account.min_equity() {
            EquityTier::BelowMinimum
        } else if investment < account.recommended_equity() {
            EquityTier::MinimumMet
        } else {
            EquityTier::Fortified
        }
    }

    pub fn message(self, account: AccountKind) -> String {
        match self {
            EquityTier::BelowMinimum => {
                format!("Minimum Equity: {} required", account.format(account.min_equity()))
            }
            EquityTier::MinimumMet => {
                format!("Recommended: {} for stability", account.format(account.recommended_equity()))
            }
            EquityTier::Fortified => "Fortified Equity Level reached".to_string(),
        }
    }
}

// ─── Projection ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub account:    AccountKind,
    pub investment: f64,
    pub tier:       EquityTier,
    /// `None` below the minimum equity.
    pub daily:      Option<f64>,
    pub weekly:     Option<f64>,
    pub monthly:    Option<f64>,
}

impl Projection {
    pub fn new(investment: f64, account: AccountKind) -> Self {
        let tier = EquityTier::classify(investment, account);
        let daily = (tier != EquityTier::BelowMinimum).then(|| investment * AVG_DAILY_RATE);

        Self {
            account,
            investment,
            tier,
            daily,
            weekly: daily.map(|d| d * TRADING_DAYS_PER_WEEK),
            monthly: daily.map(|d| d * TRADING_DAYS_PER_MONTH),
        }
    }

    /// From the raw input box text. Empty or unparsable input counts as 0.
    pub fn from_input(raw: &str, account: AccountKind) -> Self {
        let investment = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        Self::new(investment, account)
    }

    /// Display form of a projected amount, or `—` when hidden.
    pub fn display(&self, value: Option<f64>) -> String {
        value.map_or_else(|| HIDDEN.to_string(), |v| self.account.format(v))
    }
}
