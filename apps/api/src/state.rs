use std::sync::Arc;

use crate::config::Config;
use crate::layout::{PageConfig, StandardFonts, TextMeasurer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Page size, margins and typography every report is laid out with.
    pub page_config: PageConfig,
    /// Width oracle shared read-only by concurrent generation calls.
    pub metrics: Arc<dyn TextMeasurer>,
}

impl AppState {
    /// State backed by the built-in Helvetica metrics.
    pub fn new(config: &Config) -> Self {
        Self {
            page_config: config.page_config(),
            metrics: Arc::new(StandardFonts),
        }
    }
}
