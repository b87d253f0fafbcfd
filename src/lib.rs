pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

pub mod crs;
pub mod filter;
pub mod parser;
pub mod request;
pub mod xml;

// Ports and their adapters
pub mod app;
pub mod infra;

pub mod client;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{
    BoundingBox, CatalogRecord, CatalogResponse, DcValue, DublinCoreBag, ProtocolError,
    RecordFilter, Reference, SearchRequest, SearchResult,
};
