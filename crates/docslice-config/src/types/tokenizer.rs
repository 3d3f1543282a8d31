//! Tokenizer (token-counting oracle) configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Model identifier whose tokenizer defines a "token"
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
        }
    }
}

impl crate::validation::Validate for TokenizerConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_non_empty("tokenizer.model", &self.model)
    }
}

fn default_model() -> String {
    "text-embedding-ada-002".to_string()
}
