// Page layout: font metrics, word wrapping, page geometry and the cursor-driven
// layout engine. Everything here is synchronous and CPU-bound; HTTP handlers
// run it inside tokio::task::spawn_blocking.

pub mod engine;
pub mod font_metrics;
pub mod page;
pub mod wrap;

// Re-export the types application state is built from.
pub use font_metrics::{StandardFonts, TextMeasurer};
pub use page::PageConfig;
