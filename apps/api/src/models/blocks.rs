use serde::{Deserialize, Serialize};

/// One semantic unit of report content, before layout.
///
/// Blocks are consumed in order; their position in a sequence is their
/// position in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Paragraph {
        text: String,
    },
    List {
        items: Vec<String>,
        /// Draw numbered markers instead of bullets. Numbers are computed from
        /// item position when the list is drawn.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        ordered: bool,
    },
}

fn default_heading_level() -> u8 {
    1
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            level,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    pub fn list(items: Vec<String>) -> Self {
        ContentBlock::List {
            items,
            ordered: false,
        }
    }

    pub fn ordered_list(items: Vec<String>) -> Self {
        ContentBlock::List {
            items,
            ordered: true,
        }
    }

    /// True when drawing the block would put nothing on the page.
    pub fn is_blank(&self) -> bool {
        match self {
            ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } => {
                text.trim().is_empty()
            }
            ContentBlock::List { items, .. } => items.iter().all(|i| i.trim().is_empty()),
        }
    }
}

/// The three report sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    DecisionMatrix,
    Blueprint,
    BuildGuide,
}

impl SectionKind {
    /// Banner title for the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::DecisionMatrix => "Decision Matrix",
            SectionKind::Blueprint => "Project Blueprint",
            SectionKind::BuildGuide => "Build Guide",
        }
    }
}

/// Content of one report section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSection {
    pub kind: SectionKind,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl DocumentSection {
    pub fn new(kind: SectionKind, blocks: Vec<ContentBlock>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            blocks,
        }
    }

    /// A section with no drawable block is left out of the document.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(ContentBlock::is_blank)
    }
}
