//! Decoding of CSW responses into the normalized record model.

pub mod dublin_core;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_CRS, GENERIC_ERROR};
use crate::crs::{self, normalize_with, parse_corner};
use crate::error::Result;
use crate::types::{
    BoundingBox, CatalogRecord, CatalogResponse, DublinCoreBag, ProtocolError, SearchResult,
};
use crate::xml::{parse_document, XmlElement};

/// CRS assumed for an `ows:WGS84BoundingBox` without a `crs` attribute
const WGS84_BOUNDING_BOX_CRS: &str = "OGC:CRS84";

/// Root element kinds a catalog can answer with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseEnvelope<'a> {
    GetRecords(&'a XmlElement),
    GetRecordById(&'a XmlElement),
    ExceptionReport(&'a XmlElement),
    Unrecognized(&'a str),
}

pub fn classify(root: &XmlElement) -> ResponseEnvelope<'_> {
    match root.name.as_str() {
        "GetRecordsResponse" => ResponseEnvelope::GetRecords(root),
        "GetRecordByIdResponse" => ResponseEnvelope::GetRecordById(root),
        "ExceptionReport" => ResponseEnvelope::ExceptionReport(root),
        other => ResponseEnvelope::Unrecognized(other),
    }
}

pub fn parse_exception_report(root: &XmlElement) -> ProtocolError {
    let first = root.child("Exception");
    ProtocolError {
        message: first
            .and_then(|e| e.child_text("ExceptionText"))
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
        code: first.and_then(|e| e.attr("exceptionCode")).map(str::to_string),
        locator: first.and_then(|e| e.attr("locator")).map(str::to_string),
    }
}

fn parse_counter(element: &XmlElement, name: &str) -> Option<u64> {
    let raw = element.attr(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(attribute = name, value = raw, "non-numeric pagination counter");
            None
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let date = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// `gmd:dateStamp/gco:Date`, falling back to the date part of `gco:DateTime`
fn parse_date_stamp(record: &XmlElement) -> Option<NaiveDate> {
    let stamp = record.child("dateStamp")?;
    stamp
        .child_text("Date")
        .or_else(|| stamp.child_text("DateTime"))
        .and_then(|text| parse_date(&text))
}

fn parse_file_identifier(record: &XmlElement) -> Option<String> {
    record
        .child("fileIdentifier")
        .and_then(|f| f.child_text("CharacterString"))
}

fn parse_identification_info(record: &XmlElement) -> Option<serde_json::Value> {
    record
        .child("identificationInfo")
        .and_then(|info| info.children.first())
        .map(XmlElement::to_json)
}

/// OWS bounding box of a `csw:Record`. CRS resolution errors are fatal; a box
/// with unusable corners is dropped.
fn parse_ows_bounding_box(element: &XmlElement) -> Result<Option<BoundingBox>> {
    let raw_crs = match element.attr("crs") {
        Some(crs) => crs,
        None if element.name == "WGS84BoundingBox" => WGS84_BOUNDING_BOX_CRS,
        None => "",
    };
    let resolved = crs::resolve_crs(raw_crs)?;

    let lower = element.child("LowerCorner").and_then(|c| parse_corner(c.text()));
    let upper = element.child("UpperCorner").and_then(|c| parse_corner(c.text()));
    match (lower, upper) {
        (Some(lower), Some(upper)) => Ok(Some(normalize_with(&resolved, lower, upper))),
        _ => {
            warn!(crs = raw_crs, "bounding box without usable corners, skipping");
            Ok(None)
        }
    }
}

fn find_descendant<'a>(element: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    element.children.iter().find_map(|child| {
        if child.name == name {
            Some(child)
        } else {
            find_descendant(child, name)
        }
    })
}

fn decimal(element: &XmlElement, name: &str) -> Option<f64> {
    element.child(name)?.child_text("Decimal")?.parse().ok()
}

/// ISO 19139 `gmd:EX_GeographicBoundingBox`, which is longitude/latitude by schema
fn parse_geographic_extent(record: &XmlElement) -> Option<BoundingBox> {
    let info = record.child("identificationInfo")?;
    let bbox = find_descendant(info, "EX_GeographicBoundingBox")?;
    Some(BoundingBox {
        extent: [
            decimal(bbox, "westBoundLongitude")?,
            decimal(bbox, "southBoundLatitude")?,
            decimal(bbox, "eastBoundLongitude")?,
            decimal(bbox, "northBoundLatitude")?,
        ],
        crs: DEFAULT_CRS.to_string(),
    })
}

fn parse_record(record: &XmlElement) -> Result<CatalogRecord> {
    // Only the first box counts when a record carries several
    let ows_box = record
        .children
        .iter()
        .find(|c| c.name == "BoundingBox" || c.name == "WGS84BoundingBox");
    let bounding_box = match ows_box {
        Some(element) => parse_ows_bounding_box(element)?,
        None => parse_geographic_extent(record),
    };

    let dc_elements: Vec<&XmlElement> = record
        .children
        .iter()
        .filter(|c| dublin_core::is_dublin_core(c))
        .collect();
    let dc = if dc_elements.is_empty() {
        None
    } else {
        Some(dublin_core::flatten(dc_elements))
    };

    Ok(CatalogRecord {
        date_stamp: parse_date_stamp(record),
        file_identifier: parse_file_identifier(record),
        identification_info: parse_identification_info(record),
        bounding_box,
        dc,
    })
}

pub fn parse_search_results(search_results: &XmlElement) -> Result<SearchResult> {
    let records = search_results
        .children
        .iter()
        .map(parse_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchResult {
        number_of_records_matched: parse_counter(search_results, "numberOfRecordsMatched"),
        number_of_records_returned: parse_counter(search_results, "numberOfRecordsReturned"),
        next_record: parse_counter(search_results, "nextRecord"),
        records,
    })
}

/// Parses a `GetRecords` answer. Exception reports come back as
/// `CatalogResponse::Exception`; unknown roots as `NoData`.
pub fn parse_get_records(xml: &str) -> Result<CatalogResponse<SearchResult>> {
    let Some(root) = parse_document(xml)? else {
        debug!("empty catalog response");
        return Ok(CatalogResponse::NoData);
    };

    match classify(&root) {
        ResponseEnvelope::ExceptionReport(report) => {
            let error = parse_exception_report(report);
            warn!(message = %error.message, "catalog returned an exception report");
            Ok(CatalogResponse::Exception(error))
        }
        ResponseEnvelope::GetRecords(response) => match response.child("SearchResults") {
            Some(search_results) => {
                let result = parse_search_results(search_results)?;
                info!(
                    matched = ?result.number_of_records_matched,
                    returned = result.records.len(),
                    "parsed GetRecords response"
                );
                Ok(CatalogResponse::Found(result))
            }
            None => {
                debug!("GetRecordsResponse without SearchResults");
                Ok(CatalogResponse::NoData)
            }
        },
        ResponseEnvelope::GetRecordById(_) | ResponseEnvelope::Unrecognized(_) => {
            debug!(root = %root.name, "unexpected root for GetRecords");
            Ok(CatalogResponse::NoData)
        }
    }
}

/// Parses a `GetRecordById` answer down to the Dublin Core of its first record.
pub fn parse_get_record_by_id(xml: &str) -> Result<CatalogResponse<DublinCoreBag>> {
    let Some(root) = parse_document(xml)? else {
        return Ok(CatalogResponse::NoData);
    };

    match classify(&root) {
        ResponseEnvelope::ExceptionReport(report) => {
            Ok(CatalogResponse::Exception(parse_exception_report(report)))
        }
        ResponseEnvelope::GetRecordById(response) => {
            let dc_elements: Vec<&XmlElement> = response
                .children
                .first()
                .map(|record| {
                    record
                        .children
                        .iter()
                        .filter(|c| dublin_core::is_dublin_core(c))
                        .collect()
                })
                .unwrap_or_default();
            if dc_elements.is_empty() {
                debug!("GetRecordByIdResponse without Dublin Core elements");
                return Ok(CatalogResponse::NoData);
            }
            Ok(CatalogResponse::Found(dublin_core::flatten(dc_elements)))
        }
        ResponseEnvelope::GetRecords(_) | ResponseEnvelope::Unrecognized(_) => {
            debug!(root = %root.name, "unexpected root for GetRecordById");
            Ok(CatalogResponse::NoData)
        }
    }
}
