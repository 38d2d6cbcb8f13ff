pub mod api;
pub mod carousel;
pub mod chat;
pub mod directory;
pub mod domain;
pub mod report;
pub mod research;
pub mod session;
pub mod views;

#[cfg(test)]
mod testing;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    const DEFAULT_BUILD_API_URL: &str = "http://localhost:5000/api";
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 5000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_url: Option<String>,
        pub build_api_url: String,
        pub http_timeout: Duration,
        pub carousel_interval: Duration,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let http_timeout_secs = parse_env("CHANAKYA_HTTP_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
            let carousel_interval_ms = parse_env("CHANAKYA_CAROUSEL_INTERVAL_MS")?
                .unwrap_or(DEFAULT_CAROUSEL_INTERVAL_MS);
            anyhow::ensure!(
                carousel_interval_ms > 0,
                "CHANAKYA_CAROUSEL_INTERVAL_MS must be > 0"
            );

            Ok(Self {
                api_url: non_empty_env("CHANAKYA_API_URL"),
                build_api_url: non_empty_env("CHANAKYA_BUILD_API_URL")
                    .unwrap_or_else(|| DEFAULT_BUILD_API_URL.to_string()),
                http_timeout: Duration::from_secs(http_timeout_secs),
                carousel_interval: Duration::from_millis(carousel_interval_ms),
                sentry_dsn: non_empty_env("SENTRY_DSN"),
            })
        }

        pub fn require_api_url(&self) -> anyhow::Result<&str> {
            self.api_url
                .as_deref()
                .context("CHANAKYA_API_URL is required")
        }
    }

    fn non_empty_env(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parse_env(key: &str) -> anyhow::Result<Option<u64>> {
        non_empty_env(key)
            .map(|s| {
                s.parse::<u64>()
                    .with_context(|| format!("{key} must be an unsigned integer (got {s:?})"))
            })
            .transpose()
    }
}
