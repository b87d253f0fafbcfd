use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{CatalogError, Result};
use crate::filter::Filter;

/// Pagination window plus optional filter for a GetRecords call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub start_position: u32,
    pub max_records: u32,
    pub filter: Option<RecordFilter>,
}

impl SearchRequest {
    pub fn new(start_position: u32, max_records: u32) -> Result<Self> {
        if start_position < 1 {
            return Err(CatalogError::InvalidRequest(
                "startPosition must be at least 1".into(),
            ));
        }
        if max_records < 1 {
            return Err(CatalogError::InvalidRequest(
                "maxRecords must be at least 1".into(),
            ));
        }
        Ok(Self {
            start_position,
            max_records,
            filter: None,
        })
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Search constraint accepted by the request builder
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFilter {
    /// Free text matched against `csw:AnyText`
    Text(String),
    Structured(Filter),
}

impl From<Filter> for RecordFilter {
    fn from(filter: Filter) -> Self {
        RecordFilter::Structured(filter)
    }
}

/// A Dublin Core value: scalar on first sight, promoted to a sequence on repeat
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DcValue {
    Single(String),
    Many(Vec<String>),
}

impl DcValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            DcValue::Single(value) => Some(value),
            DcValue::Many(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            DcValue::Single(value) => vec![value.as_str()],
            DcValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Link-type Dublin Core entry (`dct:references`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DublinCoreBag {
    #[serde(flatten)]
    pub elements: BTreeMap<String, DcValue>,
    pub references: Vec<Reference>,
}

impl DublinCoreBag {
    pub fn get(&self, name: &str) -> Option<&DcValue> {
        self.elements.get(name)
    }
}

/// Extent is always `[minX, minY, maxX, maxY]` with longitude first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub extent: [f64; 4],
    pub crs: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub date_stamp: Option<NaiveDate>,
    pub file_identifier: Option<String>,
    pub identification_info: Option<serde_json::Value>,
    pub bounding_box: Option<BoundingBox>,
    pub dc: Option<DublinCoreBag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub number_of_records_matched: Option<u64>,
    pub number_of_records_returned: Option<u64>,
    pub next_record: Option<u64>,
    pub records: Vec<CatalogRecord>,
}

/// Error reported by the server through an `ows:ExceptionReport`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolError {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

/// Outcome of a catalog operation that reached the server.
///
/// Serializes to the payload itself, to `{"error": ...}`, or to `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogResponse<T> {
    Found(T),
    Exception(ProtocolError),
    NoData,
}

impl<T> CatalogResponse<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CatalogResponse::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn exception(&self) -> Option<&ProtocolError> {
        match self {
            CatalogResponse::Exception(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, CatalogResponse::NoData)
    }
}
