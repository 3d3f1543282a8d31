use serde::{Deserialize, Serialize};

/// One logical section of a structured document.
///
/// Heading fields use the empty string for "no heading". A non-empty `sect2`
/// always comes with a non-empty `sect1`; all headings empty is legal for
/// flat documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub document: String,
    pub chapter: String,
    pub sect1: String,
    pub sect2: String,
    /// Raw, unnormalized text
    pub text: String,
}

impl Section {
    pub fn new(
        document: impl Into<String>,
        chapter: impl Into<String>,
        sect1: impl Into<String>,
        sect2: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            chapter: chapter.into(),
            sect1: sect1.into(),
            sect2: sect2.into(),
            text: text.into(),
        }
    }

    /// Heading lines from the document down to the deepest non-empty level
    pub fn breadcrumb(&self) -> Vec<String> {
        let mut lines = vec![format!("# {}", self.document)];
        if !self.chapter.is_empty() {
            lines.push(format!("## {}", self.chapter));
        }
        if !self.sect1.is_empty() {
            lines.push(format!("### {}", self.sect1));
        }
        if !self.sect2.is_empty() {
            lines.push(format!("#### {}", self.sect2));
        }
        lines
    }
}

/// A chunk body with its character span in the normalized source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
}
