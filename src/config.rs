use serde::Deserialize;
use std::fs;
use std::path::Path;
use crate::error::{CatalogError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "catalog.toml";
pub const CATALOG_URL_ENV: &str = "CSW_CATALOG_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Default CSW endpoint used when the CLI is not given `--url`
    pub catalog_url: Option<String>,
    pub page_size: u32,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_url: None,
            page_size: 10,
            timeout_seconds: 30,
            user_agent: format!("csw_catalog/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    /// Loads `catalog.toml` when present, falling back to defaults, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: CatalogConfig = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(CATALOG_URL_ENV) {
            if !url.trim().is_empty() {
                self.catalog_url = Some(url);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CatalogError::Config("page_size must be at least 1".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(CatalogError::Config("timeout_seconds must be at least 1".into()));
        }
        Ok(())
    }
}
