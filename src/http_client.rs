use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::api::{Endpoint, Payload};
use crate::config::{Config, normalize_base_url};

const USER_AGENT_VALUE: &str = concat!("football_dashboard/", env!("CARGO_PKG_VERSION"));

/// Something that can GET a URL and hand back the response body.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;
}

pub struct HttpTransport {
    timeout: Duration,
    client: OnceCell<Client>,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .build()
                .context("failed to build http client")
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let resp = self
            .client()?
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}: {}", status, snippet(&body)));
        }
        Ok(body)
    }
}

/// API client bound to one base URL. Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            transport,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api_url,
            Arc::new(HttpTransport::new(config.request_timeout)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub fn fetch(&self, endpoint: &Endpoint) -> Result<Payload> {
        let url = self.url_for(endpoint);
        let body = self
            .transport
            .get(&url)
            .with_context(|| format!("GET {url}"))?;
        endpoint.decode(&body)
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 120;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX).collect();
    format!("{cut}...")
}
