//! Report generation: plan records in, paginated PDF out.
//!
//! Pipeline per call: flatten each supplied record into blocks, lay the
//! blocks out on pages behind a title page, stamp page numbers, serialize.
//! Everything is synchronous and owned by the call; only the measurer is
//! shared.
//!
//! - `flatten`: plan record → `ContentBlock`s
//! - `compose`: title page + bannered sections → `Page`s
//! - `finalize`: `Page i of N` footers
//! - `pdf`: pages → PDF bytes
//! - `handlers`: HTTP surface

pub mod compose;
pub mod finalize;
pub mod flatten;
pub mod handlers;
pub mod pdf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ReportError;
use crate::layout::font_metrics::{FontFace, TextMeasurer};
use crate::layout::page::{Page, PageConfig};
use crate::models::blocks::{ContentBlock, DocumentSection, SectionKind};
use crate::models::lenient;
use crate::models::plan::{Blueprint, BuildGuide, DecisionMatrix, SectionSource};

use self::compose::TitlePage;
use self::flatten::PlanRecord;
use self::pdf::DocumentInfo;

pub const DEFAULT_TITLE: &str = "Project Report";
pub const MAX_TITLE_CHARS: usize = 300;

/// Body of an export or preview request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub decision_matrix: Option<SectionSource<DecisionMatrix>>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub blueprint: Option<SectionSource<Blueprint>>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub build_guide: Option<SectionSource<BuildGuide>>,
}

impl ReportRequest {
    /// Title shown on the title page, falling back to `DEFAULT_TITLE`.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

/// A finished report.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

/// What a report would contain, without the PDF bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPreview {
    pub title: String,
    pub filename: String,
    pub page_count: usize,
    pub sections: Vec<DocumentSection>,
}

/// Builds the document sections for every usable section of the request.
///
/// Absent sections, and sections that flatten to nothing, are left out.
pub fn build_sections(request: &ReportRequest) -> Vec<DocumentSection> {
    let mut sections = Vec::new();

    if let Some(source) = &request.decision_matrix {
        push_section(&mut sections, SectionKind::DecisionMatrix, source, PlanRecord::DecisionMatrix);
    }
    if let Some(source) = &request.blueprint {
        push_section(&mut sections, SectionKind::Blueprint, source, PlanRecord::Blueprint);
    }
    if let Some(source) = &request.build_guide {
        push_section(&mut sections, SectionKind::BuildGuide, source, PlanRecord::BuildGuide);
    }

    sections
}

fn push_section<'a, T>(
    sections: &mut Vec<DocumentSection>,
    kind: SectionKind,
    source: &'a SectionSource<T>,
    tag: fn(&'a T) -> PlanRecord<'a>,
) {
    let blocks: Vec<ContentBlock> = match source {
        SectionSource::Blocks(blocks) => blocks.iter().filter(|b| !b.is_blank()).cloned().collect(),
        SectionSource::Record(record) => flatten::flatten(tag(record)),
    };
    let section = DocumentSection::new(kind, blocks);
    if section.is_empty() {
        debug!(section = ?kind, "section has no content, omitting");
        return;
    }
    sections.push(section);
}

/// Download filename for a report title: lowercase ASCII slug plus `.pdf`.
pub fn suggested_filename(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "report.pdf".to_string()
    } else {
        format!("{slug}.pdf")
    }
}

/// Generates the full report for `request`.
pub fn generate_report(
    request: &ReportRequest,
    measurer: &dyn TextMeasurer,
    config: &PageConfig,
    generated_at: DateTime<Utc>,
) -> Result<ReportOutput, ReportError> {
    let (title_page, sections, pages) = lay_out(request, measurer, config, generated_at)?;

    let info = DocumentInfo {
        title: title_page.title.clone(),
        author: title_page.project_name.clone(),
        created_at: generated_at,
    };
    let bytes = pdf::write_pdf(&pages, &info)?;

    info!(
        pages = pages.len(),
        sections = sections.len(),
        bytes = bytes.len(),
        "report generated"
    );

    Ok(ReportOutput {
        bytes,
        filename: suggested_filename(&title_page.title),
        page_count: pages.len(),
    })
}

/// Lays the report out and describes it, without serializing.
pub fn preview_report(
    request: &ReportRequest,
    measurer: &dyn TextMeasurer,
    config: &PageConfig,
    generated_at: DateTime<Utc>,
) -> Result<ReportPreview, ReportError> {
    let (title_page, sections, pages) = lay_out(request, measurer, config, generated_at)?;
    Ok(ReportPreview {
        filename: suggested_filename(&title_page.title),
        title: title_page.title,
        page_count: pages.len(),
        sections,
    })
}

fn lay_out(
    request: &ReportRequest,
    measurer: &dyn TextMeasurer,
    config: &PageConfig,
    generated_at: DateTime<Utc>,
) -> Result<(TitlePage, Vec<DocumentSection>, Vec<Page>), ReportError> {
    if let Some(face) = FontFace::ALL.into_iter().find(|f| !measurer.supports(*f)) {
        return Err(ReportError::Font(face));
    }

    let title_page = TitlePage {
        title: request.display_title().to_string(),
        project_name: request.project_name.clone(),
        generated_at,
    };
    let sections = build_sections(request);

    let mut pages = compose::render(&title_page, &sections, measurer, config);
    finalize::stamp(&mut pages, measurer, config);

    Ok((title_page, sections, pages))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
