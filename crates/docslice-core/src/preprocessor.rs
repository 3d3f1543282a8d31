//! Document-level entry point: markup in, ordered chunks out.

use crate::assembler::ChunkAssembler;
use crate::chunking::{normalize, BoundaryChunker, TiktokenCounter};
use crate::error::{ChunkError, Result};
use crate::markup;
use crate::models::Section;
use crate::sections::SectionExtractor;
use crate::traits::TokenCounter;
use docslice_config::{ChunkMode, Config};
use std::path::Path;
use tracing::{debug, info};

/// Chunks a DocBook-style document in either [`ChunkMode`].
///
/// In plain mode the whole document text is chunked with no breadcrumb. In
/// hierarchical mode every section is chunked separately and each chunk is
/// prefixed with the section's heading lineage.
pub struct DocumentPreprocessor<C> {
    config: Config,
    chunker: BoundaryChunker<C>,
}

impl DocumentPreprocessor<TiktokenCounter> {
    /// Preprocessor counting tokens with the configured `tokenizer.model`
    pub fn from_config(config: Config) -> Result<Self> {
        let counter = TiktokenCounter::for_model(&config.tokenizer.model)?;
        Ok(Self::new(config, counter))
    }
}

impl<C: TokenCounter> DocumentPreprocessor<C> {
    pub fn new(config: Config, counter: C) -> Self {
        let chunker = BoundaryChunker::new(&config.chunking, counter);
        Self { config, chunker }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn counter(&self) -> &C {
        self.chunker.counter()
    }

    /// Token count of `text` under the configured counter
    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        self.counter().count(text)
    }

    /// Chunks of `content` in the configured mode
    pub fn create_chunks(&self, content: &str) -> Result<Vec<String>> {
        let chunks = match self.config.document.mode {
            ChunkMode::Plain => self.plain_chunks(content)?,
            ChunkMode::Hierarchical => self.hierarchical_chunks(content)?,
        };
        info!(
            mode = %self.config.document.mode,
            chunks = chunks.len(),
            "created chunks"
        );
        Ok(chunks)
    }

    /// Whole-document text, cross references resolved, no breadcrumb
    pub fn plain_chunks(&self, content: &str) -> Result<Vec<String>> {
        let mut tree = markup::parse(content)?;
        let xrefs = tree.resolve_xrefs();
        debug!(xrefs, "resolved cross references");
        self.chunker.chunk(&normalize(&tree.text()))
    }

    /// Per-section chunks with heading breadcrumbs
    pub fn hierarchical_chunks(&self, content: &str) -> Result<Vec<String>> {
        let sections = self.sections(content)?;
        ChunkAssembler::new(&self.chunker)
            .parallel(self.config.chunking.parallel_sections)
            .assemble(&sections)
    }

    /// Sections of `content`, named after `document.name`
    pub fn sections(&self, content: &str) -> Result<Vec<Section>> {
        let tree = markup::parse(content)?;
        Ok(SectionExtractor::new(self.config.document.name.as_str())
            .keep_titles(self.config.document.keep_titles)
            .extract(&tree))
    }
}

/// Read a whole document as UTF-8 text
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ChunkError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = content.len(), "read document");
    Ok(content)
}
