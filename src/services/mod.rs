//! # services
//!
//! Page-side helpers that sit around the chart: the USDT→IDR rate lookup,
//! the trial countdown, the investment calculator and subscription pricing.

pub mod calculator;
pub mod countdown;
pub mod pricing;
pub mod rates;

/// Group the integer part of an amount in threes: `1234567` → `1,234,567`.
pub(crate) fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
