use crate::config::Settings;
use crate::domain::portfolio::Quote;
use crate::quotes::error::QuoteFetchError;
use crate::quotes::types::QuoteEnvelope;
use crate::quotes::QuoteProvider;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

const QUOTE_PATH: &str = "/v7/finance/quote";
const CLIENT_USER_AGENT: &str = concat!("gtb/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpQuoteProvider {
    http: reqwest::Client,
    base_url: String,
}

impl HttpQuoteProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(default_headers());
        // No timeout unless configured; a slow ticker holds the whole batch.
        if let Some(timeout) = settings.quote_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build quote http client")?;

        Ok(Self {
            http,
            base_url: settings.quote_base_url().to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), QUOTE_PATH)
    }

    async fn fetch_envelope(&self, ticker: &str) -> Result<QuoteEnvelope> {
        let res = self
            .http
            .get(self.url())
            .query(&[("symbols", ticker)])
            .send()
            .await
            .map_err(|e| QuoteFetchError::new(ticker, "request", e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| QuoteFetchError::new(ticker, "read_body", e.to_string()))?;

        if !status.is_success() {
            return Err(QuoteFetchError::new(ticker, "status", format!("HTTP {status}: {text}")).into());
        }

        parse_envelope(ticker, &text)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers
}

fn parse_envelope(ticker: &str, text: &str) -> Result<QuoteEnvelope> {
    let envelope = serde_json::from_str::<QuoteEnvelope>(text)
        .map_err(|e| QuoteFetchError::new(ticker, "parse", format!("{e}: {text}")))?;
    Ok(envelope)
}

/// `None` when the envelope carries an empty result list.
pub fn quote_from_envelope(ticker: &str, envelope: &QuoteEnvelope) -> Option<Quote> {
    let first = envelope.first_result()?;
    Some(Quote {
        ticker: ticker.to_string(),
        price: first.price(),
    })
}

#[async_trait::async_trait]
impl QuoteProvider for HttpQuoteProvider {
    fn provider_name(&self) -> &'static str {
        "yahoo_v7_quote"
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<Option<Quote>> {
        let envelope = self.fetch_envelope(ticker).await?;
        Ok(quote_from_envelope(ticker, &envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_result_price() {
        let v = json!({
            "quoteResponse": {
                "result": [
                    {"symbol": "AAPL", "regularMarketPrice": 189.25, "currency": "USD"},
                    {"symbol": "AAPL", "regularMarketPrice": 1.0}
                ],
                "error": null
            }
        });
        let envelope = parse_envelope("AAPL", &v.to_string()).unwrap();
        let quote = quote_from_envelope("AAPL", &envelope).unwrap();
        assert_eq!(quote.ticker, "AAPL");
        assert_eq!(quote.price, Some(189.25));
    }

    #[test]
    fn empty_result_is_no_quote() {
        let v = json!({"quoteResponse": {"result": [], "error": null}});
        let envelope = parse_envelope("RIO", &v.to_string()).unwrap();
        assert!(quote_from_envelope("RIO", &envelope).is_none());
    }

    #[test]
    fn missing_or_non_numeric_price_is_absent() {
        let v = json!({"quoteResponse": {"result": [{"symbol": "BHP"}]}});
        let envelope = parse_envelope("BHP", &v.to_string()).unwrap();
        assert_eq!(quote_from_envelope("BHP", &envelope).unwrap().price, None);

        let v = json!({"quoteResponse": {"result": [{"regularMarketPrice": "12.0"}]}});
        let envelope = parse_envelope("BHP", &v.to_string()).unwrap();
        assert_eq!(quote_from_envelope("BHP", &envelope).unwrap().price, None);
    }

    #[test]
    fn rejects_unexpected_shape_with_ticker_context() {
        let err = parse_envelope("TSLA", "{\"finance\": {\"error\": \"Unauthorized\"}}").unwrap_err();
        let diag = err.downcast_ref::<QuoteFetchError>().unwrap();
        assert_eq!(diag.ticker, "TSLA");
        assert_eq!(diag.stage, "parse");
    }

    #[test]
    fn url_joins_base_and_path() {
        let settings = Settings {
            quote_base_url: Some("http://localhost:8080/".to_string()),
            ..Settings::default()
        };
        let provider = HttpQuoteProvider::from_settings(&settings).unwrap();
        assert_eq!(provider.url(), "http://localhost:8080/v7/finance/quote");
    }

    /// Serves one canned HTTP response on a local port and returns the base URL
    /// plus a handle yielding the request line it received.
    async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn provider_for(base_url: String) -> HttpQuoteProvider {
        let settings = Settings {
            quote_base_url: Some(base_url),
            quote_timeout_secs: Some(5),
            ..Settings::default()
        };
        HttpQuoteProvider::from_settings(&settings).unwrap()
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[tokio::test]
    async fn fetches_price_over_http() {
        let body = json!({"quoteResponse": {"result": [{"regularMarketPrice": 42.5}]}}).to_string();
        let (base, server) = serve_once(http_response("200 OK", &body)).await;

        let quote = provider_for(base).fetch_quote("GLEN.L").await.unwrap().unwrap();
        assert_eq!(quote.ticker, "GLEN.L");
        assert_eq!(quote.price, Some(42.5));

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /v7/finance/quote?symbols=GLEN.L "));
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let (base, server) =
            serve_once(http_response("503 Service Unavailable", "{\"error\":\"busy\"}")).await;

        let err = provider_for(base).fetch_quote("MSFT").await.unwrap_err();
        let diag = err.downcast_ref::<QuoteFetchError>().unwrap();
        assert_eq!(diag.ticker, "MSFT");
        assert_eq!(diag.stage, "status");
        assert!(diag.detail.contains("503"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn truncated_body_is_read_body_error() {
        let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 500\r\nConnection: close\r\n\r\n{\"quoteResponse\""
            .to_string();
        let (base, server) = serve_once(response).await;

        let err = provider_for(base).fetch_quote("VOO").await.unwrap_err();
        let diag = err.downcast_ref::<QuoteFetchError>().unwrap();
        assert_eq!(diag.ticker, "VOO");
        assert_eq!(diag.stage, "read_body");
        server.await.unwrap();
    }
}
