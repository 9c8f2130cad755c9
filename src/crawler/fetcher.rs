//! HTTP fetcher implementation
//!
//! One trait, one implementation: `Fetch` is the seam the crawler consumes,
//! `HttpFetcher` is the reqwest-backed implementation used by the binary.
//! Tests substitute scripted fetchers to exercise the crawl loop without a
//! network.

use std::time::Duration;

use reqwest::Client;

use crate::config::UserAgentConfig;
use crate::{Result, TrawlError};

/// Capability to fetch the text body of a page.
pub trait Fetch {
    /// Fetches a URL and returns the response body as text.
    ///
    /// Errors describe the failure well enough to be stored verbatim on a
    /// failed node's record.
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Builds an HTTP client with the configured user agent and timeouts.
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(
        user_agent: &UserAgentConfig,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, timeout)?))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrawlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| TrawlError::Http {
            url: url.to_string(),
            source,
        })
    }
}
