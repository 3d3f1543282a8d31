//! Chunking configuration

use serde::{Deserialize, Serialize};

/// Configuration for the token-bounded boundary chunker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkingConfig {
    /// Token budget per chunk
    ///
    /// A soft bound: the cut is located by searching the tokenizer, then
    /// moved to a nearby sentence or word break.
    #[serde(default = "default_target_tokens")]
    pub target_tokens: usize,

    /// How far (in characters) to look for a sentence ending or word break
    /// around a tentative cut
    #[serde(default = "default_search_chars")]
    pub max_boundary_search_chars: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,

    /// Characters that end a sentence (ASCII and full-width forms)
    #[serde(default = "default_sentence_endings")]
    pub sentence_endings: Vec<char>,

    /// Fallback break characters used when no sentence ending is in reach
    #[serde(default = "default_word_breaks")]
    pub word_breaks: Vec<char>,

    /// Chunk independent sections on the rayon pool
    #[serde(default = "default_parallel_sections")]
    pub parallel_sections: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_tokens: default_target_tokens(),
            max_boundary_search_chars: default_search_chars(),
            overlap_chars: default_overlap_chars(),
            sentence_endings: default_sentence_endings(),
            word_breaks: default_word_breaks(),
            parallel_sections: default_parallel_sections(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.target_tokens", self.target_tokens, 0)?;
        validate_positive(
            "chunking.max_boundary_search_chars",
            self.max_boundary_search_chars,
            0,
        )?;

        if self.sentence_endings.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "chunking.sentence_endings".to_string(),
                message: "at least one sentence ending character is required".to_string(),
            });
        }

        Ok(())
    }
}

fn default_target_tokens() -> usize {
    1000
}

fn default_search_chars() -> usize {
    100
}

fn default_overlap_chars() -> usize {
    100
}

pub fn default_sentence_endings() -> Vec<char> {
    vec!['.', '!', '?', '．', '。', '！', '？']
}

pub fn default_word_breaks() -> Vec<char> {
    vec![
        ',', ';', ':', ' ', '(', ')', '[', ']', '{', '}', '\t', '\n', '，', '、', '；', '：',
        '　', '（', '）', '「', '」', '『', '』', '【', '】', '｛', '｝',
    ]
}

fn default_parallel_sections() -> bool {
    true
}
