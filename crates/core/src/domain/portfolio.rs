use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tickers polled for the price snapshot, in request order.
pub const TICKERS: [&str; 7] = ["AAPL", "MSFT", "TSLA", "VOO", "GLEN.L", "RIO", "BHP"];

/// Sector allocation of the GTB index.
///
/// Published as summing to 100, but the entries total 97.5. The table is kept
/// exactly as published; nothing rescales it.
pub const SECTORS: [SectorWeight; 8] = [
    SectorWeight::new("Tech", 17.5),
    SectorWeight::new("Energy", 15.0),
    SectorWeight::new("Lumber", 10.0),
    SectorWeight::new("Mining", 15.0),
    SectorWeight::new("Auto", 15.0),
    SectorWeight::new("S&P 500", 15.0),
    SectorWeight::new("All-World", 5.0),
    SectorWeight::new("Emerging", 5.0),
];

const HUE_STEP_DEGREES: u16 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorWeight {
    pub label: &'static str,
    pub percentage: f64,
}

impl SectorWeight {
    pub const fn new(label: &'static str, percentage: f64) -> Self {
        Self { label, percentage }
    }
}

/// Chart colour for the sector at `index`: `hsl(index * 45, 70%, 60%)`.
pub fn sector_hue(index: usize) -> u16 {
    ((index as u16).wrapping_mul(HUE_STEP_DEGREES)) % 360
}

pub fn allocation_total(sectors: &[SectorWeight]) -> f64 {
    sectors.iter().map(|s| s.percentage).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub price: Option<f64>,
}

/// Ticker -> last price. A key with `None` means the lookup answered but had
/// no price; failed lookups have no key at all.
pub type PriceMap = BTreeMap<String, Option<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub prices: PriceMap,
    pub fetched_at: DateTime<Utc>,
}

impl PriceSnapshot {
    pub fn from_quotes(quotes: impl IntoIterator<Item = Quote>, fetched_at: DateTime<Utc>) -> Self {
        let prices = quotes.into_iter().map(|q| (q.ticker, q.price)).collect();
        Self { prices, fetched_at }
    }

    pub fn portfolio_value(&self) -> f64 {
        portfolio_value(&self.prices)
    }

    pub fn estimated_income(&self, dividend_yield: f64) -> f64 {
        estimated_income(self.portfolio_value(), dividend_yield)
    }
}

/// Plain sum of every present price. Not weighted, not currency normalised.
pub fn portfolio_value(prices: &PriceMap) -> f64 {
    prices.values().flatten().sum()
}

pub fn estimated_income(portfolio_value: f64, dividend_yield: f64) -> f64 {
    portfolio_value * dividend_yield
}
