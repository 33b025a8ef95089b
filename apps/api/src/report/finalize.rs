//! Finalizer: stamps `Page i of N` on every page once layout is complete.

use crate::layout::font_metrics::{FontFace, TextMeasurer};
use crate::layout::page::{Color, DrawCommand, Page, PageConfig};

/// Appends a centred page number near the bottom edge of each page.
///
/// Runs after all content is placed because it needs the final page count.
/// Only adds commands; nothing already on a page is moved or removed.
pub fn stamp(pages: &mut [Page], measurer: &dyn TextMeasurer, config: &PageConfig) {
    let total = pages.len();
    let size = config.typography.footer_size;

    for (index, page) in pages.iter_mut().enumerate() {
        let label = format!("Page {} of {}", index + 1, total);
        let width = measurer.width_of(&label, FontFace::Regular, size);
        page.push(DrawCommand::Text {
            x: (page.width - width) / 2.0,
            y: page.margins.bottom / 2.0,
            text: label,
            face: FontFace::Regular,
            size,
            color: Color::MUTED,
        });
    }
}
