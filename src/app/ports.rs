use async_trait::async_trait;

use crate::error::Result;

/// Raw HTTP exchange with a catalog endpoint. Implementations return the
/// response body; network and HTTP status failures surface as errors.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;

    async fn post(&self, url: &str, body: String, content_type: &str) -> Result<String>;
}
