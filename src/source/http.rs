use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::remote::{Page, PageFetcher, PageReply};
use crate::settings::Settings;

const API_KEY_HEADER: &str = "x-api-key";

/// `GET {base}?page=N` with the API key header.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        if !settings.has_api_key() {
            warn!("OPTCG_API_KEY not set; requests will be unauthenticated");
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher {
            client,
            base_url: settings.api_base.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&mut self, page: u32) -> Result<PageReply> {
        debug!("GET {} page {}", self.base_url, page);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .with_context(|| format!("Request for page {} failed", page))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(PageReply::Rejected {
                status: status.as_u16(),
            });
        }

        let body: Page = response
            .json()
            .await
            .with_context(|| format!("Page {} is not a valid card listing", page))?;
        Ok(PageReply::Success(body))
    }
}
