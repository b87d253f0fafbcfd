use url::Url;

use crate::constants::{
    CSW_SERVICE, CSW_VERSION, FILTER_VERSION, GET_RECORD_BY_ID, REQUEST_NAMESPACES,
    XML_CONTENT_TYPE,
};
use crate::error::Result;
use crate::filter::{dataset_filter, text_filter};
use crate::types::RecordFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Everything the transport needs to issue one catalog call
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
}

/// Re-joins query fragments separated by stray `?` with `&`.
///
/// `http://host/wms??service=WMS` becomes `http://host/wms?service=WMS`.
pub fn clean_duplicated_question_marks(url: &str) -> String {
    let mut parts = url.split('?');
    let base = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.len() < 2 {
        return url.to_string();
    }
    let query = rest
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}

fn is_protocol_key(key: &str) -> bool {
    ["service", "version", "request"]
        .iter()
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
}

fn rebuild_query(raw: &str, operation: Option<&str>) -> Result<String> {
    let cleaned = clean_duplicated_question_marks(raw);
    let mut url = Url::parse(&cleaned)?;

    // Retained pairs are re-serialized form-urlencoded, e.g. `id=topp:x` becomes `id=topp%3Ax`
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_protocol_key(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.append_pair("service", CSW_SERVICE);
        pairs.append_pair("version", CSW_VERSION);
        if let Some(operation) = operation {
            pairs.append_pair("request", operation);
        }
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.to_string())
}

/// Forces `service=CSW&version=2.0.2` and drops any `request` parameter; the
/// operation travels in the POST body.
pub fn normalize_service_url(raw: &str) -> Result<String> {
    rebuild_query(raw, None)
}

fn constraint_xml(filter: Option<&RecordFilter>) -> String {
    match filter {
        Some(RecordFilter::Structured(filter)) => filter.to_xml(),
        Some(RecordFilter::Text(text)) if !text.is_empty() => text_filter(text).to_xml(),
        _ => dataset_filter().to_xml(),
    }
}

/// Builds a CSW 2.0.2 `GetRecords` body.
///
/// `start_position` and `max_records` go into the envelope untouched.
pub fn build_get_records(
    start_position: u32,
    max_records: u32,
    filter: Option<&RecordFilter>,
) -> String {
    let namespaces = REQUEST_NAMESPACES
        .iter()
        .map(|(prefix, uri)| format!("xmlns:{prefix}=\"{uri}\""))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "<csw:GetRecords {namespaces} service=\"{CSW_SERVICE}\" version=\"{CSW_VERSION}\" \
         resultType=\"results\" startPosition=\"{start_position}\" maxRecords=\"{max_records}\">\
         <csw:Query typeNames=\"csw:Record\">\
         <csw:ElementSetName>full</csw:ElementSetName>\
         <csw:Constraint version=\"{FILTER_VERSION}\">{}</csw:Constraint>\
         </csw:Query>\
         </csw:GetRecords>",
        constraint_xml(filter)
    )
}

pub fn build_get_records_request(
    url: &str,
    start_position: u32,
    max_records: u32,
    filter: Option<&RecordFilter>,
) -> Result<CatalogRequest> {
    Ok(CatalogRequest {
        method: HttpMethod::Post,
        url: normalize_service_url(url)?,
        body: Some(build_get_records(start_position, max_records, filter)),
        content_type: Some(XML_CONTENT_TYPE),
    })
}

/// GET descriptor for a record lookup URL.
///
/// Unlike [`normalize_service_url`], this does not just strip `request`: a GET
/// has no body to name the operation, so any caller value (including
/// `request=GetRecords`) is rewritten to `request=GetRecordById`. Other
/// parameters such as `id` or `outputSchema` are kept in order.
pub fn build_get_record_by_id(url: &str) -> Result<CatalogRequest> {
    Ok(CatalogRequest {
        method: HttpMethod::Get,
        url: rebuild_query(url, Some(GET_RECORD_BY_ID))?,
        body: None,
        content_type: None,
    })
}
