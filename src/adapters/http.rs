use crate::domain::ports::{FetchedPage, Fetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("scalesite-seo/", env!("CARGO_PKG_VERSION"));

/// Fetches pages over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Fetching {}", url);
        let response = request.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let html = response.text().await?;
        tracing::debug!("Fetched {} ({} bytes, status {})", final_url, html.len(), status);

        Ok(FetchedPage {
            url: final_url,
            status,
            html,
        })
    }
}
