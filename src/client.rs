use tracing::{info, instrument};

use crate::app::ports::CatalogTransport;
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::filter::workspace_filter;
use crate::infra::http_client::ReqwestTransport;
use crate::parser::{parse_get_record_by_id, parse_get_records};
use crate::request::{build_get_record_by_id, build_get_records_request, CatalogRequest, HttpMethod};
use crate::types::{CatalogResponse, DublinCoreBag, RecordFilter, SearchRequest, SearchResult};

/// Stateless CSW client: one request, one parse, one outcome per call.
pub struct CatalogClient<T: CatalogTransport> {
    transport: T,
}

impl CatalogClient<ReqwestTransport> {
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(Self::new(ReqwestTransport::from_config(config)?))
    }
}

impl<T: CatalogTransport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: CatalogRequest) -> Result<String> {
        match request.method {
            HttpMethod::Get => self.transport.get(&request.url).await,
            HttpMethod::Post => {
                let content_type = request.content_type.unwrap_or_default();
                self.transport
                    .post(&request.url, request.body.unwrap_or_default(), content_type)
                    .await
            }
        }
    }

    /// Fetches a single record and returns only its Dublin Core.
    #[instrument(skip(self))]
    pub async fn get_record_by_id(&self, url: &str) -> Result<CatalogResponse<DublinCoreBag>> {
        let request = build_get_record_by_id(url)?;
        let body = self.send(request).await?;
        parse_get_record_by_id(&body)
    }

    #[instrument(skip(self, filter))]
    pub async fn get_records(
        &self,
        url: &str,
        start_position: u32,
        max_records: u32,
        filter: Option<RecordFilter>,
    ) -> Result<CatalogResponse<SearchResult>> {
        let request = build_get_records_request(url, start_position, max_records, filter.as_ref())?;
        let body = self.send(request).await?;
        let response = parse_get_records(&body)?;
        if let CatalogResponse::Found(result) = &response {
            info!(
                "Fetched {} of {:?} records from {}",
                result.records.len(),
                result.number_of_records_matched,
                url
            );
        }
        Ok(response)
    }

    pub async fn search(&self, url: &str, request: &SearchRequest) -> Result<CatalogResponse<SearchResult>> {
        self.get_records(
            url,
            request.start_position,
            request.max_records,
            request.filter.clone(),
        )
        .await
    }

    pub async fn text_search(
        &self,
        url: &str,
        start_position: u32,
        max_records: u32,
        text: &str,
    ) -> Result<CatalogResponse<SearchResult>> {
        self.get_records(
            url,
            start_position,
            max_records,
            Some(RecordFilter::Text(text.to_string())),
        )
        .await
    }

    pub async fn workspace_search(
        &self,
        url: &str,
        start_position: u32,
        max_records: u32,
        text: Option<&str>,
        workspace: Option<&str>,
    ) -> Result<CatalogResponse<SearchResult>> {
        let filter = workspace_filter(text, workspace);
        self.get_records(url, start_position, max_records, Some(filter.into()))
            .await
    }
}
