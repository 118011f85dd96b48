use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

pub const USER_AGENT: &str = concat!("crashguard/", env!("CARGO_PKG_VERSION"));

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Shared client for data fetches: retries transient failures
    pub fn create_client() -> ClientWithMiddleware {
        // Exponential backoff, max 3 retries
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        ClientBuilder::new(Self::create_plain_client())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    /// Client without retries, for non-idempotent POSTs such as notifications
    pub fn create_plain_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Join `path` onto `base_url` and append the query parameters.
///
/// reqwest-middleware 0.5 doesn't expose `.query()`, so the URL is built up front.
pub fn build_url<K, V>(base_url: &str, path: &str, params: &[(K, V)]) -> Result<Url>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined).with_context(|| format!("Invalid URL: {}", joined))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k.as_ref(), v.as_ref());
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_params() {
        let url = build_url(
            "https://query1.finance.yahoo.com/",
            "/v8/finance/chart/^VIX",
            &[("range", "10d"), ("interval", "1d")],
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("query1.finance.yahoo.com"));
        assert!(url.path().starts_with("/v8/finance/chart/"));
        assert!(url.path().ends_with("VIX"));
        assert_eq!(url.query(), Some("range=10d&interval=1d"));
    }

    #[test]
    fn test_build_url_without_params() {
        let empty: [(&str, &str); 0] = [];
        let url = build_url("http://localhost:8080", "fred/series", &empty).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/fred/series");
    }

    #[test]
    fn test_build_url_rejects_garbage() {
        let empty: [(&str, &str); 0] = [];
        assert!(build_url("not a url", "x", &empty).is_err());
    }
}
