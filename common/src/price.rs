//! Parsing of localized (pt-BR) currency strings and ordering checks over the
//! resulting price lists.

use serde::Deserialize;
use std::{
    error::Error,
    fmt::{Display, Formatter},
};

pub const CURRENCY_SYMBOL: &str = "R$";

/// Parses a display price such as `"R$ 1.234,56"` into `1234.56`.
///
/// Anything without numeric content parses to `0.0`, so a formatting drift on
/// the page shows up as a wrong price in an assertion rather than as an error.
pub fn parse_price(raw: &str) -> f64 {
    parse_price_strict(raw).unwrap_or(0.0)
}

/// Same normalization as [`parse_price`], but reports unparseable input.
pub fn parse_price_strict(raw: &str) -> Result<f64, MalformedPrice> {
    let amount = normalize(raw);
    // Only digits and the decimal point; `f64::from_str` would also take `1e3`.
    if !amount.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(MalformedPrice(raw.to_owned()));
    }
    amount
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MalformedPrice(raw.to_owned()))
}

fn normalize(raw: &str) -> String {
    // Drops the currency symbol and any label around the amount ("/dia", NBSPs).
    let amount = raw
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .trim_end_matches(|c: char| !c.is_ascii_digit());

    amount
        .chars()
        .filter(|&c| c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Formats a value the way the site renders prices: `1234.56` -> `"R$ 1.234,56"`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{} {},{:02}", sign, CURRENCY_SYMBOL, grouped, cents % 100)
}

/// True iff `prices` equals its stably sorted copy, element for element.
pub fn is_ascending(prices: &[f64]) -> bool {
    let mut sorted = prices.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
        .iter()
        .zip(prices)
        .all(|(a, b)| a.total_cmp(b).is_eq())
}

/// Index of the first price that is smaller than its predecessor.
pub fn first_descent(prices: &[f64]) -> Option<usize> {
    prices
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|i| i + 1)
}

/// How scraped price texts are read, selected by `price_parsing` in the suite
/// configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceParsing {
    /// Unparseable strings become `0.0`.
    #[default]
    Lenient,
    /// Unparseable strings fail with [`MalformedPrice`].
    Strict,
}

impl PriceParsing {
    pub fn parse(self, raw: &str) -> Result<f64, MalformedPrice> {
        match self {
            PriceParsing::Lenient => Ok(parse_price(raw)),
            PriceParsing::Strict => parse_price_strict(raw),
        }
    }

    pub fn parse_all<S: AsRef<str>>(self, raws: &[S]) -> Result<Vec<f64>, MalformedPrice> {
        raws.iter().map(|raw| self.parse(raw.as_ref())).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPrice(pub String);

impl Display for MalformedPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed price {:?}", self.0)
    }
}

impl Error for MalformedPrice {}
