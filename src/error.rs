use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog responded with HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("XML decoding failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("No suitable EPSG numeric conversion found for \"{crs}\"")]
    CrsResolution { crs: String },

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Network or HTTP-level failure, surfaced unchanged and never retried.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Http(_) | CatalogError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
