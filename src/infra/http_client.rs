use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::app::ports::CatalogTransport;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} from {}", status.as_u16(), url);
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        tracing::debug!("HTTP response: status={}, size={} bytes", status.as_u16(), body.len());
        Ok(body)
    }
}

#[async_trait]
impl CatalogTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        tracing::info!("HTTP GET request to: {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_body(response, url).await
    }

    async fn post(&self, url: &str, body: String, content_type: &str) -> Result<String> {
        tracing::info!("HTTP POST request to: {} ({} bytes)", url, body.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::read_body(response, url).await
    }
}
