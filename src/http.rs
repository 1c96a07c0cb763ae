use reqwest::Client;
use std::time::Duration;

fn env_secs(key: &str, default: u64) -> Duration {
    let secs = std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}

/// Shared outbound HTTP client. Hosted inference endpoints can cold-start, so
/// the request timeout sits well above the connect timeout.
pub fn build_client() -> Client {
    Client::builder()
        .timeout(env_secs("HTTP_TIMEOUT_SECS", 25))
        .connect_timeout(env_secs("HTTP_CONNECT_TIMEOUT_SECS", 5))
        .build()
        .unwrap_or_else(|_| Client::new())
}
