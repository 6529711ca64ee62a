use reqwest::Client;
use std::time::Duration;

/// Browser-like agent; Yahoo rejects requests without one.
const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; credrate/", env!("CARGO_PKG_VERSION"), ")");

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client for upstream data providers.
    ///
    /// No retry middleware: an upstream failure fails the request.
    pub fn create_client(timeout_secs: u64) -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
