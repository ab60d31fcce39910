use std::fmt;

#[derive(Debug, Clone)]
pub struct QuoteFetchError {
    pub ticker: String,
    pub stage: &'static str,
    pub detail: String,
}

impl QuoteFetchError {
    pub fn new(ticker: &str, stage: &'static str, detail: impl Into<String>) -> Self {
        Self {
            ticker: ticker.to_string(),
            stage,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for QuoteFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quote lookup failed (ticker={}, stage={}): {}",
            self.ticker, self.stage, self.detail
        )
    }
}

impl std::error::Error for QuoteFetchError {}
