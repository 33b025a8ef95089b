//! Page Layout Engine: places content blocks on pages with a vertical cursor.
//!
//! # Cursor model
//! - `cursor_y` is the top of the next line box, in PDF user space (it shrinks as
//!   content is drawn).
//! - A line set at size `s` has its baseline at `cursor_y - s` and advances the
//!   cursor by `s × line_height_factor`.
//! - Before every line the engine checks `cursor_y - line_height < bottom margin`
//!   using that line's own height, and starts a new page when it does not fit.
//!   Lines are therefore never split across pages.

use crate::layout::font_metrics::{sanitize, FontFace, TextMeasurer};
use crate::layout::page::{Color, DrawCommand, Page, PageConfig};
use crate::layout::wrap::wrap;
use crate::models::blocks::ContentBlock;

/// Vertical padding inside a section banner, above and below its title.
const BANNER_PADDING: f32 = 10.0;
/// Space between the banner and the first block of its section.
const BANNER_GAP: f32 = 18.0;
/// Bézier control-point factor for approximating a quarter circle.
const CIRCLE_KAPPA: f32 = 0.552_284_8;

// ────────────────────────────────────────────────────────────────────────────
// Layout state
// ────────────────────────────────────────────────────────────────────────────

/// Mutable layout state of a single generation call.
///
/// `pages` only ever grows and `current_page` always indexes its last page.
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub current_page: usize,
    pub cursor_y: f32,
    pub pages: Vec<Page>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct LayoutEngine<'a> {
    measurer: &'a dyn TextMeasurer,
    config: &'a PageConfig,
    state: LayoutState,
}

impl<'a> LayoutEngine<'a> {
    /// Creates an engine holding one empty page with the cursor at its top.
    pub fn new(measurer: &'a dyn TextMeasurer, config: &'a PageConfig) -> Self {
        Self {
            measurer,
            config,
            state: LayoutState {
                current_page: 0,
                cursor_y: config.content_top(),
                pages: vec![Page::new(config)],
            },
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn config(&self) -> &'a PageConfig {
        self.config
    }

    /// Consumes the engine and returns its pages in order.
    pub fn into_pages(self) -> Vec<Page> {
        self.state.pages
    }

    /// Appends a fresh page and moves the cursor to its top margin.
    pub fn new_page(&mut self) {
        self.state.pages.push(Page::new(self.config));
        self.state.current_page = self.state.pages.len() - 1;
        self.state.cursor_y = self.config.content_top();
    }

    /// Moves the cursor down by `gap` points without drawing.
    pub fn skip(&mut self, gap: f32) {
        self.state.cursor_y -= gap;
    }

    /// Moves the cursor to an absolute height on the current page.
    pub fn move_cursor_to(&mut self, y: f32) {
        self.state.cursor_y = y;
    }

    /// Draws one content block at the cursor.
    pub fn draw(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { text, level } => self.draw_heading(text, *level),
            ContentBlock::Paragraph { text } => self.draw_paragraph(text),
            ContentBlock::List { items, ordered } => self.draw_list(items, *ordered),
        }
    }

    fn draw_heading(&mut self, text: &str, level: u8) {
        let text = sanitize(text);
        let size = self.config.heading_size(level);
        let lines = wrap(
            &text,
            self.measurer,
            FontFace::Bold,
            size,
            self.config.content_width(),
        );
        if lines.is_empty() {
            return;
        }
        if !self.at_page_top() {
            self.skip(self.config.typography.heading_gap);
        }
        let color = if level <= 1 { Color::ACCENT } else { Color::INK };
        let x = self.config.margins.left;
        for line in lines {
            self.place_line(line, x, FontFace::Bold, size, color);
        }
    }

    fn draw_paragraph(&mut self, text: &str) {
        let text = sanitize(text);
        let size = self.config.typography.body_size;
        let lines = wrap(
            &text,
            self.measurer,
            FontFace::Regular,
            size,
            self.config.content_width(),
        );
        if lines.is_empty() {
            return;
        }
        let x = self.config.margins.left;
        for line in lines {
            self.place_line(line, x, FontFace::Regular, size, Color::INK);
        }
        self.skip(self.config.typography.paragraph_gap);
    }

    fn draw_list(&mut self, items: &[String], ordered: bool) {
        let config = self.config;
        let measurer = self.measurer;
        let typography = &config.typography;
        let size = typography.body_size;
        let marker_x = config.margins.left + typography.bullet_indent;
        let text_x = config.margins.left + typography.list_text_indent;
        let text_width = config.content_width() - typography.list_text_indent;

        let wrapped: Vec<Vec<String>> = items
            .iter()
            .map(|item| wrap(&sanitize(item), measurer, FontFace::Regular, size, text_width))
            .filter(|lines| !lines.is_empty())
            .collect();
        if wrapped.is_empty() {
            return;
        }

        for (position, lines) in wrapped.into_iter().enumerate() {
            for (i, line) in lines.into_iter().enumerate() {
                let baseline = self.place_line(line, text_x, FontFace::Regular, size, Color::INK);
                if i == 0 {
                    if ordered {
                        self.draw_number_marker(position + 1, marker_x, baseline, size);
                    } else {
                        self.draw_bullet_marker(marker_x, baseline, size);
                    }
                }
            }
        }
        self.skip(typography.list_gap);
    }

    fn draw_bullet_marker(&mut self, cx: f32, baseline: f32, size: f32) {
        self.push(DrawCommand::Circle {
            cx,
            cy: baseline + size * 0.3,
            radius: size * 0.16,
            color: Color::INK,
        });
    }

    /// Numbered circle; the number is derived from the item's position only.
    fn draw_number_marker(&mut self, number: usize, cx: f32, baseline: f32, size: f32) {
        let cy = baseline + size * 0.3;
        let radius = size * 0.62;
        let label = number.to_string();
        let label_size = if label.len() > 2 { size * 0.5 } else { size * 0.68 };
        let label_width = self.measurer.width_of(&label, FontFace::Bold, label_size);
        self.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color: Color::ACCENT,
        });
        self.push(DrawCommand::Text {
            x: cx - label_width / 2.0,
            y: cy - label_size * 0.35,
            text: label,
            face: FontFace::Bold,
            size: label_size,
            color: Color::WHITE,
        });
    }

    /// Starts a new page and draws a section banner at its top.
    ///
    /// The banner is a filled rectangle holding the wrapped title, followed by a
    /// caption line (project name and timestamp).
    pub fn draw_banner(&mut self, title: &str, caption: &str) {
        self.new_page();

        let config = self.config;
        let size = config.typography.banner_size;
        let caption_size = config.typography.caption_size;
        let line_height = config.line_height(size);
        let inner_x = config.margins.left + BANNER_PADDING;
        let inner_width = config.content_width() - 2.0 * BANNER_PADDING;

        let title = sanitize(title);
        let lines = wrap(&title, self.measurer, FontFace::Bold, size, inner_width);
        let height = lines.len().max(1) as f32 * line_height + 2.0 * BANNER_PADDING;
        let top = config.content_top();

        self.push(DrawCommand::Rect {
            x: config.margins.left,
            y: top - height,
            width: config.content_width(),
            height,
            color: Color::ACCENT,
        });

        self.move_cursor_to(top - BANNER_PADDING);
        for line in lines {
            self.place_line(line, inner_x, FontFace::Bold, size, Color::WHITE);
        }
        self.move_cursor_to(top - height - caption_size * 0.5);

        let caption = sanitize(caption);
        if !caption.trim().is_empty() {
            self.place_line(caption, config.margins.left, FontFace::Regular, caption_size, Color::MUTED);
        }
        self.skip(BANNER_GAP);
    }

    /// Draws already wrapped, sanitized lines centred horizontally, starting
    /// at the cursor.
    pub fn draw_centered_lines(&mut self, lines: &[String], face: FontFace, size: f32, color: Color) {
        for line in lines {
            let width = self.measurer.width_of(line, face, size);
            let x = ((self.config.width - width) / 2.0).max(self.config.margins.left);
            self.place_line(line.clone(), x, face, size, color);
        }
    }

    /// Draws a horizontal rule of `width` centred on the page at the cursor.
    pub fn draw_centered_rule(&mut self, width: f32, color: Color) {
        let x1 = (self.config.width - width) / 2.0;
        let y = self.state.cursor_y;
        self.push(DrawCommand::Line {
            x1,
            y1: y,
            x2: x1 + width,
            y2: y,
            width: 1.0,
            color,
        });
    }

    // ────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ────────────────────────────────────────────────────────────────────

    fn at_page_top(&self) -> bool {
        self.state.cursor_y >= self.config.content_top()
    }

    /// Starts a new page if a line of `line_height` does not fit above the bottom
    /// margin. A fresh page is never abandoned, so an impossibly tall line
    /// cannot cause an endless run of empty pages.
    fn ensure_room(&mut self, line_height: f32) {
        let fits = self.state.cursor_y - line_height >= self.config.margins.bottom;
        if !fits && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Places one already-wrapped line and returns its baseline.
    fn place_line(&mut self, text: String, x: f32, face: FontFace, size: f32, color: Color) -> f32 {
        let line_height = self.config.line_height(size);
        self.ensure_room(line_height);
        let baseline = self.state.cursor_y - size;
        self.push(DrawCommand::Text {
            x,
            y: baseline,
            text,
            face,
            size,
            color,
        });
        self.state.cursor_y -= line_height;
        baseline
    }

    fn push(&mut self, command: DrawCommand) {
        let index = self.state.current_page;
        self.state.pages[index].push(command);
    }
}

/// Cubic Bézier segments approximating a circle, as `(c1, c2, end)` triples.
pub fn circle_segments(cx: f32, cy: f32, r: f32) -> [[(f32, f32); 3]; 4] {
    let k = r * CIRCLE_KAPPA;
    [
        [(cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)],
        [(cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)],
        [(cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)],
        [(cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)],
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
