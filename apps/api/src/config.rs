use anyhow::{anyhow, Context, Result};

use crate::layout::page::{page_config_for, PageConfig, PageSize, MIN_MARGIN_PT};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub page_size: PageSize,
    pub margin_pt: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let page_size = match lookup("REPORT_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<PageSize>()
                .map_err(|e| anyhow!(e))
                .context("REPORT_PAGE_SIZE must be 'a4' or 'letter'")?,
            None => PageSize::default(),
        };

        let margin_pt = lookup("REPORT_MARGIN_PT")
            .unwrap_or_else(|| "50".to_string())
            .parse::<f32>()
            .context("REPORT_MARGIN_PT must be a number")?;
        let (width, height) = page_size.dimensions_pt();
        if !margin_pt.is_finite() || margin_pt < MIN_MARGIN_PT {
            return Err(anyhow!(
                "REPORT_MARGIN_PT={margin_pt} is below the {MIN_MARGIN_PT}pt needed for the page footer"
            ));
        }
        if margin_pt * 4.0 >= width.min(height) {
            return Err(anyhow!(
                "REPORT_MARGIN_PT={margin_pt} leaves no room for content on {page_size:?}"
            ));
        }

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            page_size,
            margin_pt,
        })
    }

    pub fn page_config(&self) -> PageConfig {
        page_config_for(self.page_size, self.margin_pt)
    }
}
