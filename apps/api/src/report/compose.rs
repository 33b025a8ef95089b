//! Section Orchestrator: title page first, then one bannered section per
//! supplied record in fixed order.

use chrono::{DateTime, Utc};

use crate::layout::engine::LayoutEngine;
use crate::layout::font_metrics::{sanitize, FontFace, TextMeasurer};
use crate::layout::page::{Color, Page, PageConfig};
use crate::layout::wrap::wrap;
use crate::models::blocks::DocumentSection;

/// Preferred top of the title block, as a fraction of the page height.
const TITLE_ANCHOR: f32 = 0.62;
const TITLE_RULE_WIDTH: f32 = 120.0;
const RULE_GAP_ABOVE: f32 = 6.0;
const RULE_GAP_BELOW: f32 = 14.0;
const MAX_TITLE_LINES: usize = 6;
const MAX_PROJECT_LINES: usize = 2;
/// The title shrinks in 2pt steps down to this size before it is cut short.
const MIN_TITLE_SIZE: f32 = 14.0;
const ELLIPSIS: &str = "...";

/// What the title page shows.
#[derive(Debug, Clone)]
pub struct TitlePage {
    pub title: String,
    pub project_name: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl TitlePage {
    /// Human-readable generation timestamp.
    pub fn timestamp(&self) -> String {
        self.generated_at.format("%B %-d, %Y at %H:%M UTC").to_string()
    }

    /// Caption under each section banner.
    fn banner_caption(&self) -> String {
        match &self.project_name {
            Some(name) => format!("{name} | {}", self.timestamp()),
            None => self.timestamp(),
        }
    }
}

/// Lays out the whole document and returns its pages.
///
/// Sections are drawn in `SectionKind` order whatever order they arrive in;
/// empty ones are skipped. With no sections the result is the title page alone.
pub fn render(
    title_page: &TitlePage,
    sections: &[DocumentSection],
    measurer: &dyn TextMeasurer,
    config: &PageConfig,
) -> Vec<Page> {
    let mut engine = LayoutEngine::new(measurer, config);
    let block = fit_title_block(title_page, measurer, config);
    draw_title_page(&mut engine, &block);

    let mut ordered: Vec<&DocumentSection> = sections.iter().filter(|s| !s.is_empty()).collect();
    ordered.sort_by_key(|s| s.kind);

    let caption = title_page.banner_caption();
    for section in ordered {
        engine.draw_banner(&section.title, &caption);
        for block in &section.blocks {
            engine.draw(block);
        }
    }

    engine.into_pages()
}

// ────────────────────────────────────────────────────────────────────────────
// Title page
// ────────────────────────────────────────────────────────────────────────────

/// Wrapped title page lines, sized so the whole block fits on one page.
#[derive(Debug)]
struct TitleBlock {
    title: Vec<String>,
    title_size: f32,
    project: Vec<String>,
    project_size: f32,
    generated: Vec<String>,
    generated_size: f32,
}

impl TitleBlock {
    fn height(&self, config: &PageConfig) -> f32 {
        self.title.len() as f32 * config.line_height(self.title_size)
            + RULE_GAP_ABOVE
            + RULE_GAP_BELOW
            + self.project.len() as f32 * config.line_height(self.project_size)
            + self.generated.len() as f32 * config.line_height(self.generated_size)
    }
}

/// Wraps the title page text, shrinking the title until it fits in
/// `MAX_TITLE_LINES` and the block fits between the margins. Past
/// `MIN_TITLE_SIZE` the title is cut short; the project name is always capped
/// at `MAX_PROJECT_LINES`.
fn fit_title_block(title_page: &TitlePage, measurer: &dyn TextMeasurer, config: &PageConfig) -> TitleBlock {
    let typography = &config.typography;
    let width = config.content_width();
    let available = config.content_top() - config.margins.bottom;

    let project_size = typography.heading_sizes[1];
    let project = match &title_page.project_name {
        Some(name) => {
            let lines = wrap(&sanitize(name), measurer, FontFace::Regular, project_size, width);
            clamp_lines(lines, MAX_PROJECT_LINES, measurer, FontFace::Regular, project_size, width).0
        }
        None => Vec::new(),
    };
    let generated_size = typography.body_size;
    let generated_text = format!("Generated {}", title_page.timestamp());
    let generated = wrap(&generated_text, measurer, FontFace::Regular, generated_size, width);

    let title_text = sanitize(&title_page.title);
    let mut title_size = typography.title_size;
    loop {
        let lines = wrap(&title_text, measurer, FontFace::Bold, title_size, width);
        let (title, cut) = clamp_lines(lines, MAX_TITLE_LINES, measurer, FontFace::Bold, title_size, width);
        let block = TitleBlock {
            title,
            title_size,
            project: project.clone(),
            project_size,
            generated: generated.clone(),
            generated_size,
        };
        let fits = !cut && block.height(config) <= available;
        if fits || title_size <= MIN_TITLE_SIZE {
            return block;
        }
        title_size = (title_size - 2.0).max(MIN_TITLE_SIZE);
    }
}

/// Keeps at most `max` lines; when lines are dropped the last kept line ends
/// in an ellipsis that still fits `width`. Returns whether anything was cut.
fn clamp_lines(
    mut lines: Vec<String>,
    max: usize,
    measurer: &dyn TextMeasurer,
    face: FontFace,
    size: f32,
    width: f32,
) -> (Vec<String>, bool) {
    if lines.len() <= max {
        return (lines, false);
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && measurer.width_of(&format!("{last}{ELLIPSIS}"), face, size) > width {
            last.pop();
        }
        let kept = last.trim_end().len();
        last.truncate(kept);
        last.push_str(ELLIPSIS);
    }
    (lines, true)
}

/// Draws the title block on the first page. The block top sits at
/// `TITLE_ANCHOR` unless that would push it past the bottom margin, in which
/// case it moves up; the first page is never left.
fn draw_title_page(engine: &mut LayoutEngine<'_>, block: &TitleBlock) {
    let config = engine.config();
    let height = block.height(config);
    let preferred = (config.height * TITLE_ANCHOR).min(config.content_top());
    let top = if preferred - height < config.margins.bottom {
        (config.margins.bottom + height).min(config.content_top())
    } else {
        preferred
    };

    engine.move_cursor_to(top);
    engine.draw_centered_lines(&block.title, FontFace::Bold, block.title_size, Color::INK);

    engine.skip(RULE_GAP_ABOVE);
    engine.draw_centered_rule(TITLE_RULE_WIDTH, Color::ACCENT);
    engine.skip(RULE_GAP_BELOW);

    engine.draw_centered_lines(&block.project, FontFace::Regular, block.project_size, Color::INK);
    engine.draw_centered_lines(&block.generated, FontFace::Regular, block.generated_size, Color::MUTED);
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::StandardFonts;
    use crate::layout::font_metrics::testing::Monospace;
    use crate::layout::page::{default_page_config, page_config_for, DrawCommand, PageSize};
    use crate::models::blocks::{ContentBlock, SectionKind};
    use chrono::TimeZone;

    fn title_page(project: Option<&str>) -> TitlePage {
        TitlePage {
            title: "Report".to_string(),
            project_name: project.map(str::to_string),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    fn section(kind: SectionKind, paragraphs: usize) -> DocumentSection {
        let blocks = (0..paragraphs)
            .map(|i| {
                ContentBlock::paragraph(format!(
                    "Paragraph {i}: keep the harness tidy, label every connector and \
                     photograph the wiring before closing the enclosure."
                ))
            })
            .collect();
        DocumentSection::new(kind, blocks)
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(title_page(None).timestamp(), "March 9, 2026 at 14:05 UTC");
    }

    #[test]
    fn test_no_sections_yields_single_title_page() {
        let config = default_page_config();
        let pages = render(&title_page(None), &[], &StandardFonts, &config);
        assert_eq!(pages.len(), 1);
        let texts: Vec<&str> = pages[0].texts().collect();
        assert_eq!(texts, vec!["Report", "Generated March 9, 2026 at 14:05 UTC"]);
    }

    #[test]
    fn test_title_page_shows_project_name_and_rule() {
        let config = default_page_config();
        let pages = render(&title_page(Some("Rover")), &[], &StandardFonts, &config);
        let texts: Vec<&str> = pages[0].texts().collect();
        assert_eq!(texts[1], "Rover");
        assert!(pages[0]
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let config = default_page_config();
        let sections = vec![
            DocumentSection::new(SectionKind::DecisionMatrix, vec![]),
            section(SectionKind::BuildGuide, 1),
        ];
        let pages = render(&title_page(None), &sections, &StandardFonts, &config);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].texts().next(), Some("Build Guide"));
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let config = default_page_config();
        let sections = vec![
            section(SectionKind::BuildGuide, 1),
            section(SectionKind::DecisionMatrix, 1),
            section(SectionKind::Blueprint, 1),
        ];
        let pages = render(&title_page(None), &sections, &StandardFonts, &config);
        let banners: Vec<&str> = pages[1..].iter().filter_map(|p| p.texts().next()).collect();
        assert_eq!(banners, vec!["Decision Matrix", "Project Blueprint", "Build Guide"]);
    }

    #[test]
    fn test_each_section_starts_on_new_page() {
        let config = default_page_config();
        let sections = vec![
            section(SectionKind::DecisionMatrix, 1),
            section(SectionKind::Blueprint, 1),
        ];
        let pages = render(&title_page(Some("Rover")), &sections, &StandardFonts, &config);
        assert_eq!(pages.len(), 3);
        for page in &pages[1..] {
            assert!(matches!(page.commands[0], DrawCommand::Rect { .. }));
            let caption = page.texts().nth(1).expect("caption");
            assert!(caption.starts_with("Rover | "), "caption was {caption:?}");
        }
    }

    #[test]
    fn test_page_count_grows_with_content() {
        let config = default_page_config();
        let mut last = 0;
        for paragraphs in [0, 5, 20, 60, 120] {
            let sections = vec![section(SectionKind::Blueprint, paragraphs)];
            let count = render(&title_page(None), &sections, &StandardFonts, &config).len();
            assert!(count >= last, "{paragraphs} paragraphs gave {count} < {last}");
            last = count;
        }
        assert!(last > 3);
    }

    fn long_title_page(title: String, project: Option<String>) -> TitlePage {
        TitlePage {
            title,
            project_name: project,
            generated_at: Utc.with_ymd_and_hms(2026, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_long_title_shrinks_instead_of_spilling() {
        let config = default_page_config();
        let page = long_title_page(format!("{}WMX", "WM ".repeat(99)), None);
        let block = fit_title_block(&page, &StandardFonts, &config);
        assert!(block.title_size < config.typography.title_size);
        assert!(block.title.len() <= MAX_TITLE_LINES);
        assert!(!block.title.last().expect("title line").ends_with(ELLIPSIS));

        let pages = render(&page, &[], &StandardFonts, &config);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_long_project_name_is_cut_short() {
        let config = default_page_config();
        let name = "Autonomous greenhouse irrigation controller ".repeat(120);
        let page = long_title_page("Report".to_string(), Some(name));
        let block = fit_title_block(&page, &StandardFonts, &config);
        assert_eq!(block.project.len(), MAX_PROJECT_LINES);
        let last = block.project.last().expect("project line");
        assert!(last.ends_with(ELLIPSIS), "last line was {last:?}");
        let width = StandardFonts.width_of(last, FontFace::Regular, block.project_size);
        assert!(width <= config.content_width());
    }

    #[test]
    fn test_title_block_stays_above_bottom_margin() {
        let config = page_config_for(PageSize::Letter, 140.0);
        let page = long_title_page(
            "Telemetry ".repeat(30),
            Some("Ground station ".repeat(300)),
        );
        let pages = render(&page, &[], &Monospace, &config);
        assert_eq!(pages.len(), 1);
        for command in &pages[0].commands {
            if let DrawCommand::Text { y, text, .. } = command {
                assert!(*y >= config.margins.bottom, "{text:?} drawn at {y}");
                assert!(*y <= config.content_top(), "{text:?} drawn at {y}");
            }
        }
    }

    #[test]
    fn test_clamp_lines_keeps_short_input() {
        let lines = vec!["one".to_string(), "two".to_string()];
        let (kept, cut) = clamp_lines(lines.clone(), 2, &Monospace, FontFace::Regular, 10.0, 100.0);
        assert_eq!(kept, lines);
        assert!(!cut);
    }
}
