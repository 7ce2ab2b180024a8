use crate::error::{Result, TaskError};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

/// Source of page bodies for the title scraper.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Single GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Uses a preconfigured client; `timeout` should match the one set on it.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn map_error(&self, error: reqwest::Error) -> TaskError {
        if error.is_timeout() {
            TaskError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            TaskError::from(error)
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        tracing::info!(%url, timeout = ?self.timeout, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        tracing::debug!(%url, %status, "response received");

        let response = response.error_for_status().map_err(|e| self.map_error(e))?;
        response.text().map_err(|e| self.map_error(e))
    }
}

/// Accepts absolute http(s) URLs only.
pub fn parse_page_url(input: &str) -> Result<Url> {
    let input = input.trim();
    let url = Url::parse(input).map_err(|_| TaskError::InvalidUrl {
        url: input.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(TaskError::InvalidUrl {
            url: input.to_string(),
        }),
    }
}
