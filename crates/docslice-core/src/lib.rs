//! Token-bounded chunking of structured technical manuals.
//!
//! A DocBook-style document is parsed into a [`markup::Element`] tree,
//! optionally flattened into heading-labelled [`Section`]s, normalized, and
//! cut into overlapping chunks whose size is governed by a [`TokenCounter`].
//!
//! ```no_run
//! use docslice_config::Config;
//! use docslice_core::{read_document, DocumentPreprocessor};
//!
//! let content = read_document("manual.sgml")?;
//! let preprocessor = DocumentPreprocessor::from_config(Config::load()?)?;
//! for chunk in preprocessor.create_chunks(&content)? {
//!     println!("{chunk}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod chunking;
pub mod error;
pub mod markup;
pub mod models;
pub mod preprocessor;
pub mod sections;
pub mod traits;

pub use assembler::ChunkAssembler;
pub use chunking::{normalize, BoundaryChunker, TiktokenCounter, TokenEstimator};
pub use error::{ChunkError, Result};
pub use models::{Section, TextChunk};
pub use preprocessor::{read_document, DocumentPreprocessor};
pub use sections::{extract_sections, SectionExtractor};
pub use traits::TokenCounter;
