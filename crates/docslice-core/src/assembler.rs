//! Turns sections into breadcrumb-prefixed chunks.

use crate::chunking::{normalize, BoundaryChunker};
use crate::error::Result;
use crate::models::Section;
use crate::traits::TokenCounter;
use rayon::prelude::*;
use tracing::debug;

/// Normalizes and chunks each section's text, then prefixes every body with
/// the section's heading breadcrumb.
///
/// Output order is section order, then chunk order within a section,
/// whether or not sections are processed in parallel.
pub struct ChunkAssembler<'a, C> {
    chunker: &'a BoundaryChunker<C>,
    parallel: bool,
}

impl<'a, C: TokenCounter> ChunkAssembler<'a, C> {
    pub fn new(chunker: &'a BoundaryChunker<C>) -> Self {
        Self {
            chunker,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn assemble(&self, sections: &[Section]) -> Result<Vec<String>> {
        let per_section: Vec<Vec<String>> = if self.parallel {
            sections
                .par_iter()
                .map(|section| self.assemble_section(section))
                .collect::<Result<_>>()?
        } else {
            sections
                .iter()
                .map(|section| self.assemble_section(section))
                .collect::<Result<_>>()?
        };

        let chunks: Vec<String> = per_section.into_iter().flatten().collect();
        debug!(
            sections = sections.len(),
            chunks = chunks.len(),
            parallel = self.parallel,
            "assembled chunks"
        );
        Ok(chunks)
    }

    /// Chunks of one section, each prefixed with its breadcrumb
    pub fn assemble_section(&self, section: &Section) -> Result<Vec<String>> {
        let header = section.breadcrumb().join("\n");
        let text = normalize(&section.text);

        Ok(self
            .chunker
            .chunk(&text)?
            .into_iter()
            .map(|body| format!("{header}\n{body}"))
            .collect())
    }
}
