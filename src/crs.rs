//! Coordinate reference system reconciliation for catalog bounding boxes.
//!
//! EPSG:4326 is latitude-first by authority definition while the record model
//! keeps every extent longitude-first. CRS84 is longitude-first by definition,
//! so only non-CRS84 spellings of 4326 get their axes swapped.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::DEFAULT_CRS;
use crate::error::{CatalogError, Result};
use crate::types::BoundingBox;

// A code followed by '.' is a registry version (`EPSG:6.6:4326`), not a code
static EXPLICIT_EPSG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"EPSG:([0-9]+)(?:$|[^0-9.])").expect("valid EPSG pattern"));

const EPSG_PREFIX: &str = "EPSG:";

/// Authority/code pair read from a URN or OGC HTTP URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityCode {
    pub authority: String,
    pub code: String,
}

impl AuthorityCode {
    /// `urn:ogc:def:crs:EPSG::4326`, `urn:ogc:def:crs:OGC:1.3:CRS84`
    pub fn from_urn(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() < 7 {
            return None;
        }
        Self::build(parts[4], parts[6])
    }

    /// `http://www.opengis.net/def/crs/EPSG/0/4326`
    pub fn from_http_uri(value: &str) -> Option<Self> {
        let (_, path) = value.split_once("/def/crs/")?;
        let parts: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        match parts.as_slice() {
            [authority, _version, code] => Self::build(authority, code),
            _ => None,
        }
    }

    /// `http://www.opengis.net/gml/srs/epsg.xml#4326`
    pub fn from_gml_srs(value: &str) -> Option<Self> {
        let (_, code) = value.split_once("epsg.xml#")?;
        Self::build("EPSG", code)
    }

    fn build(authority: &str, code: &str) -> Option<Self> {
        let authority = authority.trim();
        let code = code.trim();
        if authority.is_empty() || code.is_empty() {
            return None;
        }
        Some(Self {
            authority: authority.to_ascii_uppercase(),
            code: code.to_string(),
        })
    }
}

impl std::fmt::Display for AuthorityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Result of resolving a raw CRS attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCrs {
    /// Canonical `EPSG:<n>` form
    pub epsg: String,
    /// Whether corners arrive latitude-first and must be swapped
    pub swap_axes: bool,
}

/// Canonical numeric EPSG code for an `EPSG:`-prefixed (or bare) identifier.
pub fn make_numeric_epsg(value: &str) -> Option<String> {
    let code = value.strip_prefix(EPSG_PREFIX).unwrap_or(value);
    match code {
        "CRS84" | "OGC:CRS84" => Some(DEFAULT_CRS.to_string()),
        c if !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()) => {
            Some(format!("{EPSG_PREFIX}{c}"))
        }
        _ => None,
    }
}

/// Picks the CRS identifier out of a raw attribute value, in precedence order:
/// explicit `EPSG:<digits>`, URN/URI authority and code, last colon segment.
pub fn extract_crs(raw: &str) -> String {
    if let Some(code) = EXPLICIT_EPSG.captures(raw).and_then(|c| c.get(1)) {
        return format!("{EPSG_PREFIX}{}", code.as_str());
    }

    let parsed = AuthorityCode::from_urn(raw)
        .or_else(|| AuthorityCode::from_http_uri(raw))
        .or_else(|| AuthorityCode::from_gml_srs(raw));
    if let Some(parsed) = parsed {
        return parsed.to_string();
    }

    raw.rsplit(':').next().unwrap_or_default().trim().to_string()
}

fn is_crs84(identifier: &str) -> bool {
    identifier == "CRS84" || identifier == "OGC:CRS84"
}

pub fn resolve_crs(raw: &str) -> Result<ResolvedCrs> {
    let extracted = extract_crs(raw);

    let epsg = if extracted.is_empty() {
        DEFAULT_CRS.to_string()
    } else {
        let candidate = if extracted.starts_with(EPSG_PREFIX) {
            extracted.clone()
        } else {
            format!("{EPSG_PREFIX}{extracted}")
        };
        make_numeric_epsg(&candidate).ok_or_else(|| CatalogError::CrsResolution {
            crs: extracted.clone(),
        })?
    };

    let swap_axes = epsg == DEFAULT_CRS && !is_crs84(&extracted);
    debug!(raw, extracted = %extracted, epsg = %epsg, swap_axes, "resolved bounding box CRS");

    Ok(ResolvedCrs { epsg, swap_axes })
}

/// Parses an OWS position such as `"45.1 7.6"`; extra dimensions are ignored.
pub fn parse_corner(text: &str) -> Option<[f64; 2]> {
    let mut values = text.split_whitespace().map(str::parse::<f64>);
    let first = values.next()?.ok()?;
    let second = values.next()?.ok()?;
    Some([first, second])
}

/// Extent from two corners already in longitude-first order
pub fn make_bbox_from_ows(lower: [f64; 2], upper: [f64; 2]) -> [f64; 4] {
    [lower[0], lower[1], upper[0], upper[1]]
}

pub fn normalize_with(resolved: &ResolvedCrs, lower: [f64; 2], upper: [f64; 2]) -> BoundingBox {
    let (lower, upper) = if resolved.swap_axes {
        ([lower[1], lower[0]], [upper[1], upper[0]])
    } else {
        (lower, upper)
    };

    BoundingBox {
        extent: make_bbox_from_ows(lower, upper),
        crs: resolved.epsg.clone(),
    }
}

/// Builds a longitude-first bounding box from a raw CRS value and two corners.
pub fn normalize(raw_crs: &str, lower: [f64; 2], upper: [f64; 2]) -> Result<BoundingBox> {
    let resolved = resolve_crs(raw_crs)?;
    Ok(normalize_with(&resolved, lower, upper))
}
