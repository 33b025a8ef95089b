//! PDF serializer: writes laid-out pages as a PDF 1.7 file.
//!
//! Text uses the standard Type1 fonts (Helvetica, Helvetica-Bold) with
//! WinAnsi encoding, so nothing is embedded. Drawn strings are sanitized ASCII
//! and are written byte for byte. Page content streams are zlib-compressed.

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::errors::ReportError;
use crate::layout::engine::circle_segments;
use crate::layout::font_metrics::FontFace;
use crate::layout::page::{Color, DrawCommand, Page};

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Document-level metadata written to the info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Serializes `pages` into PDF bytes.
pub fn write_pdf(pages: &[Page], info: &DocumentInfo) -> Result<Vec<u8>, ReportError> {
    if pages.is_empty() {
        return Err(ReportError::Serialization(
            "document has no pages".to_string(),
        ));
    }
    validate_geometry(pages)?;

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL.iter().map(|f| (*f, alloc())).collect();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    for (face, font_id) in &font_ids {
        pdf.type1_font(*font_id)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    write_info(&mut pdf, info_id, info);

    for (i, page) in pages.iter().enumerate() {
        let raw = render_content(page);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(page_ids[i]);
        page_writer
            .media_box(Rect::new(0.0, 0.0, page.width, page.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        {
            let mut resources = page_writer.resources();
            let mut fonts = resources.fonts();
            for (face, font_id) in &font_ids {
                fonts.pair(Name(face.resource_name().as_bytes()), *font_id);
            }
            fonts.finish();
        }
        page_writer.finish();
    }

    Ok(pdf.finish())
}

fn write_info(pdf: &mut Pdf, id: Ref, info: &DocumentInfo) {
    let created = &info.created_at;
    let date = Date::new(created.year().clamp(0, 9999) as u16)
        .month(created.month() as u8)
        .day(created.day() as u8)
        .hour(created.hour() as u8)
        .minute(created.minute() as u8)
        .second(created.second() as u8)
        .utc_offset_hour(0);

    let mut writer = pdf.document_info(id);
    writer
        .title(TextStr(&info.title))
        .producer(TextStr(PRODUCER))
        .creation_date(date);
    if let Some(author) = &info.author {
        writer.author(TextStr(author));
    }
    writer.finish();
}

/// Encodes one page's draw commands as a content stream.
fn render_content(page: &Page) -> Vec<u8> {
    let mut content = Content::new();
    for command in &page.commands {
        match command {
            DrawCommand::Text {
                x,
                y,
                text,
                face,
                size,
                color,
            } => {
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(face.resource_name().as_bytes()), *size);
                content.next_line(*x, *y);
                content.show(Str(text.as_bytes()));
                content.end_text();
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                content.set_stroke_rgb(color.r, color.g, color.b);
                content.set_line_width(*width);
                content.move_to(*x1, *y1);
                content.line_to(*x2, *y2);
                content.stroke();
            }
            DrawCommand::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                set_fill(&mut content, *color);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero();
            }
            DrawCommand::Circle {
                cx,
                cy,
                radius,
                color,
            } => {
                set_fill(&mut content, *color);
                content.move_to(cx + radius, *cy);
                for [(x1, y1), (x2, y2), (x3, y3)] in circle_segments(*cx, *cy, *radius) {
                    content.cubic_to(x1, y1, x2, y2, x3, y3);
                }
                content.close_path();
                content.fill_nonzero();
            }
        }
    }
    content.finish()
}

fn set_fill(content: &mut Content, color: Color) {
    content.set_fill_rgb(color.r, color.g, color.b);
}

fn validate_geometry(pages: &[Page]) -> Result<(), ReportError> {
    for (index, page) in pages.iter().enumerate() {
        if !(page.width.is_finite() && page.height.is_finite()) {
            return Err(ReportError::Serialization(format!(
                "page {} has non-finite dimensions",
                index + 1
            )));
        }
        if let Some(command) = page
            .commands
            .iter()
            .find(|c| c.numbers().iter().any(|n| !n.is_finite()))
        {
            return Err(ReportError::Serialization(format!(
                "page {} has a non-finite coordinate in {command:?}",
                index + 1
            )));
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
