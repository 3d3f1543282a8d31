//! Configuration type definitions, one module per concern

pub mod chunking;
pub mod document;
pub mod logging;
pub mod tokenizer;

pub use chunking::ChunkingConfig;
pub use document::{ChunkMode, DocumentConfig};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use tokenizer::TokenizerConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    #[serde(default)]
    pub document: DocumentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.chunking.validate()?;
        self.tokenizer.validate()?;
        self.document.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}
