pub mod error;
pub mod types;
pub mod yahoo;

use crate::domain::portfolio::{PriceSnapshot, Quote};
use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// `Ok(None)` when the endpoint answered without any result for `ticker`.
    async fn fetch_quote(&self, ticker: &str) -> Result<Option<Quote>>;
}

/// Looks up every ticker concurrently and waits for the whole batch.
///
/// Failed or empty lookups are dropped from the snapshot; this never fails.
pub async fn fetch_prices<P>(provider: &P, tickers: &[&str]) -> PriceSnapshot
where
    P: QuoteProvider + ?Sized,
{
    let lookups = tickers.iter().map(|ticker| async move {
        (*ticker, provider.fetch_quote(ticker).await)
    });
    let results = join_all(lookups).await;

    let mut quotes = Vec::with_capacity(results.len());
    let mut failures: usize = 0;
    for (ticker, res) in results {
        match res {
            Ok(Some(quote)) => quotes.push(quote),
            Ok(None) => {
                tracing::debug!(%ticker, "quote lookup returned no result; omitting");
            }
            Err(err) => {
                failures += 1;
                tracing::warn!(
                    %ticker,
                    provider = provider.provider_name(),
                    error = %err,
                    "quote lookup failed; omitting ticker"
                );
            }
        }
    }

    tracing::info!(
        requested = tickers.len(),
        received = quotes.len(),
        failures,
        "price snapshot complete"
    );

    PriceSnapshot::from_quotes(quotes, Utc::now())
}
