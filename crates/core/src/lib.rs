pub mod dashboard;
pub mod domain;
pub mod quotes;
pub mod session;
pub mod storage;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;
    use std::time::Duration;

    pub const DEFAULT_QUOTE_BASE_URL: &str = "https://query1.finance.yahoo.com";
    pub const DEFAULT_STORE_PATH: &str = ".gtb/storage.json";
    pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.018;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub quote_base_url: Option<String>,
        pub quote_timeout_secs: Option<u64>,
        pub store_path: Option<String>,
        pub dividend_yield: Option<f64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            // Empty or 0 means no timeout.
            let quote_timeout_secs = match non_empty_var("GTB_QUOTE_TIMEOUT_SECS") {
                Some(s) => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("GTB_QUOTE_TIMEOUT_SECS is not a number: {s}"))?,
                )
                .filter(|secs| *secs > 0),
                None => None,
            };

            Ok(Self {
                quote_base_url: non_empty_var("GTB_QUOTE_BASE_URL"),
                quote_timeout_secs,
                store_path: non_empty_var("GTB_STORE_PATH"),
                // A bad yield falls back to the default rather than refusing to start.
                dividend_yield: std::env::var("GTB_DIVIDEND_YIELD")
                    .ok()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                    .filter(|y| y.is_finite() && *y >= 0.0),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn quote_base_url(&self) -> &str {
            self.quote_base_url
                .as_deref()
                .unwrap_or(DEFAULT_QUOTE_BASE_URL)
        }

        pub fn quote_timeout(&self) -> Option<Duration> {
            self.quote_timeout_secs.map(Duration::from_secs)
        }

        pub fn store_path(&self) -> PathBuf {
            PathBuf::from(self.store_path.as_deref().unwrap_or(DEFAULT_STORE_PATH))
        }

        pub fn dividend_yield(&self) -> f64 {
            self.dividend_yield.unwrap_or(DEFAULT_DIVIDEND_YIELD)
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

}
