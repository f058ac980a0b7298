//! Amount validation and conversion arithmetic.
use crate::core::history::ConversionRecord;
use chrono::{DateTime, Utc};

/// Parses the amount field. Only positive finite numbers are accepted.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Formats a rate the way every panel displays it.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}

/// Two decimals, with ties rounded away from zero (`0.125` is `0.13`).
pub fn format_result(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

/// A completed conversion, ready to be displayed or recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub result: String,
}

impl Conversion {
    /// Converting a currency into itself; no rate lookup needed.
    pub fn identity(currency: &str, amount: f64) -> Self {
        Self {
            from: currency.to_string(),
            to: currency.to_string(),
            amount,
            rate: 1.0,
            result: format_result(amount),
        }
    }

    pub fn at_rate(from: &str, to: &str, amount: f64, rate: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            rate,
            result: format_result(amount * rate),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    pub fn rate_text(&self) -> String {
        if self.is_identity() {
            format!("Rate: 1 {} = 1 {}", self.from, self.to)
        } else {
            format!(
                "Rate: 1 {} = {} {}",
                self.from,
                format_rate(self.rate),
                self.to
            )
        }
    }

    pub fn into_record(self, timestamp: DateTime<Utc>) -> ConversionRecord {
        ConversionRecord {
            from: self.from,
            to: self.to,
            amount: self.amount,
            result: self.result,
            rate: self.rate,
            timestamp,
        }
    }
}
