use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const GOOGLE_PING_ENDPOINT: &str = "https://www.google.com/ping";
pub const BING_PING_ENDPOINT: &str = "https://www.bing.com/ping";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub google: bool,
    pub bing: bool,
}

/// Notifies search engines that a sitemap changed.
#[derive(Debug, Clone)]
pub struct SearchEnginePinger {
    client: Client,
    google_endpoint: String,
    bing_endpoint: String,
    timeout: Option<Duration>,
}

impl Default for SearchEnginePinger {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEnginePinger {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            google_endpoint: GOOGLE_PING_ENDPOINT.to_string(),
            bing_endpoint: BING_PING_ENDPOINT.to_string(),
            timeout: None,
        }
    }

    pub fn with_endpoints(mut self, google: impl Into<String>, bing: impl Into<String>) -> Self {
        self.google_endpoint = google.into();
        self.bing_endpoint = bing.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Both engines are tried; a failure on one never affects the other.
    pub async fn ping(&self, sitemap_url: &str) -> PingResult {
        let result = PingResult {
            google: self.ping_endpoint("Google", &self.google_endpoint, sitemap_url).await,
            bing: self.ping_endpoint("Bing", &self.bing_endpoint, sitemap_url).await,
        };
        tracing::info!(
            "Sitemap ping for {}: google={}, bing={}",
            sitemap_url,
            result.google,
            result.bing
        );
        result
    }

    async fn ping_endpoint(&self, engine: &str, endpoint: &str, sitemap_url: &str) -> bool {
        let url = match Url::parse_with_params(endpoint, &[("sitemap", sitemap_url)]) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("{} ping endpoint '{}' is invalid: {}", engine, endpoint, e);
                return false;
            }
        };

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => {
                tracing::debug!("{} ping response status: {}", engine, response.status());
                response.status().is_success()
            }
            Err(e) => {
                tracing::error!("{} ping failed: {}", engine, e);
                false
            }
        }
    }
}
