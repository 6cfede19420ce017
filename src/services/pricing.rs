//! # services::pricing
//!
//! Subscription plans, priced in rupiah.

use serde::Serialize;

use crate::services::rates::format_idr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    pub months:       u32,
    pub price_idr:    u64,
    /// Undiscounted price, when the plan is discounted.
    pub original_idr: Option<u64>,
    pub discount_pct: Option<u32>,
    pub popular:      bool,
}

pub const PLANS: [Plan; 3] = [
    Plan { months: 1, price_idr: 599_000,   original_idr: None,            discount_pct: None,     popular: false },
    Plan { months: 2, price_idr: 1_138_100, original_idr: Some(1_198_000), discount_pct: Some(5),  popular: false },
    Plan { months: 3, price_idr: 1_617_300, original_idr: Some(1_797_000), discount_pct: Some(10), popular: true  },
];

impl Plan {
    /// `1 Month`, `3 Months`.
    pub fn title(&self) -> String {
        if self.months == 1 {
            "1 Month".to_string()
        } else {
            format!("{} Months", self.months)
        }
    }

    pub fn price_label(&self) -> String {
        format_idr(self.price_idr as f64)
    }

    pub fn savings_idr(&self) -> u64 {
        self.original_idr.map_or(0, |o| o.saturating_sub(self.price_idr))
    }

    pub fn monthly_idr(&self) -> f64 {
        self.price_idr as f64 / f64::from(self.months.max(1))
    }
}
