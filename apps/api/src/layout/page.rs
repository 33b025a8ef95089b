//! Page geometry, typography and the draw commands a page is made of.

use crate::layout::font_metrics::FontFace;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Smallest usable margin. The page-number footer sits halfway down the
/// bottom margin and needs this much room to stay clear of body text.
pub const MIN_MARGIN_PT: f32 = 24.0;

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    /// 595 × 842 pt.
    #[default]
    A4,
    /// 612 × 792 pt.
    Letter,
}

impl PageSize {
    /// Page dimensions in points `(width, height)`.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.0, 842.0),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" | "us-letter" => Ok(PageSize::Letter),
            other => Err(format!("unknown page size '{other}' (expected a4 or letter)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(pt: f32) -> Self {
        Self {
            top: pt,
            bottom: pt,
            left: pt,
            right: pt,
        }
    }
}

/// Font sizes and spacing used by the layout engine. All values in points.
#[derive(Debug, Clone)]
pub struct Typography {
    pub title_size: f32,
    /// Heading sizes for level 1, 2 and 3+.
    pub heading_sizes: [f32; 3],
    pub body_size: f32,
    pub banner_size: f32,
    pub caption_size: f32,
    pub footer_size: f32,
    /// Line advance as a multiple of the font size.
    pub line_height_factor: f32,
    /// Gap inserted before a heading that is not at the top of a page.
    pub heading_gap: f32,
    pub paragraph_gap: f32,
    /// Gap after the last item of a list.
    pub list_gap: f32,
    /// Left offset of the list marker from the left margin.
    pub bullet_indent: f32,
    /// Left offset of list item text from the left margin.
    pub list_text_indent: f32,
}

/// Layout parameters for every page of a report.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub size: PageSize,
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub typography: Typography,
}

impl PageConfig {
    /// Usable column width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Cursor position at the top of a fresh page.
    pub fn content_top(&self) -> f32 {
        self.height - self.margins.top
    }

    /// Line advance for text set at `size_pt`.
    pub fn line_height(&self, size_pt: f32) -> f32 {
        size_pt * self.typography.line_height_factor
    }

    /// Heading size for a heading level (0 and 1 share the largest size).
    pub fn heading_size(&self, level: u8) -> f32 {
        let sizes = &self.typography.heading_sizes;
        match level {
            0 | 1 => sizes[0],
            2 => sizes[1],
            _ => sizes[2],
        }
    }
}

/// A4 with 50pt margins, the layout every unit test runs against.
#[cfg(test)]
pub fn default_page_config() -> PageConfig {
    page_config_for(PageSize::A4, 50.0)
}

/// Builds a page config for the given paper size and uniform margin.
pub fn page_config_for(size: PageSize, margin_pt: f32) -> PageConfig {
    let (width, height) = size.dimensions_pt();
    PageConfig {
        size,
        width,
        height,
        margins: Margins::uniform(margin_pt),
        typography: Typography {
            title_size: 26.0,
            heading_sizes: [16.0, 13.0, 11.5],
            body_size: 11.0,
            banner_size: 18.0,
            caption_size: 9.0,
            footer_size: 9.0,
            line_height_factor: 1.5,
            heading_gap: 10.0,
            paragraph_gap: 4.0,
            list_gap: 6.0,
            bullet_indent: 15.0,
            list_text_indent: 30.0,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draw commands
// ────────────────────────────────────────────────────────────────────────────

/// RGB colour with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const INK: Color = Color::rgb(0.13, 0.13, 0.15);
    pub const MUTED: Color = Color::rgb(0.45, 0.45, 0.48);
    pub const ACCENT: Color = Color::rgb(0.11, 0.30, 0.60);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// One drawing operation in PDF user space (origin bottom-left, points).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Text with its baseline starting at `(x, y)`. `text` is already sanitized.
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
    /// Filled rectangle with its lower-left corner at `(x, y)`.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    /// Filled circle, used for list markers.
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// All coordinates and extents of the command.
    pub fn numbers(&self) -> Vec<f32> {
        match self {
            DrawCommand::Text { x, y, size, .. } => vec![*x, *y, *size],
            DrawCommand::Line {
                x1, y1, x2, y2, width, ..
            } => vec![*x1, *y1, *x2, *y2, *width],
            DrawCommand::Rect {
                x, y, width, height, ..
            } => vec![*x, *y, *width, *height],
            DrawCommand::Circle { cx, cy, radius, .. } => vec![*cx, *cy, *radius],
        }
    }
}

/// A single output page. Pages are only ever appended to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            margins: config.margins,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Text strings on this page, in drawing order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_config_is_a4() {
        let config = default_page_config();
        assert_eq!(config.size, PageSize::A4);
        assert_eq!((config.width, config.height), (595.0, 842.0));
        assert_eq!(config.content_width(), 495.0);
        assert_eq!(config.content_top(), 792.0);
    }

    #[test]
    fn test_line_height_is_one_and_a_half() {
        let config = default_page_config();
        assert!((config.line_height(11.0) - 16.5).abs() < 1e-4);
    }

    #[test]
    fn test_heading_size_by_level() {
        let config = default_page_config();
        assert!(config.heading_size(1) > config.heading_size(2));
        assert!(config.heading_size(2) > config.heading_size(3));
        assert_eq!(config.heading_size(0), config.heading_size(1));
        assert_eq!(config.heading_size(7), config.heading_size(3));
    }

    #[test]
    fn test_page_size_from_str() {
        assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
        assert_eq!(" letter ".parse::<PageSize>(), Ok(PageSize::Letter));
        assert!("tabloid".parse::<PageSize>().is_err());
    }

    #[test]
    fn test_page_texts_filters_text_commands() {
        let config = default_page_config();
        let mut page = Page::new(&config);
        page.push(DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: Color::ACCENT,
        });
        page.push(DrawCommand::Text {
            x: 50.0,
            y: 700.0,
            text: "hello".to_string(),
            face: FontFace::Regular,
            size: 11.0,
            color: Color::INK,
        });
        assert_eq!(page.texts().collect::<Vec<_>>(), vec!["hello"]);
    }
}
