use crate::error::{ChunkError, Result};
use crate::traits::TokenCounter;
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// Token counter backed by the BPE tables that `tiktoken-rs` ships for a model
pub struct TiktokenCounter {
    model: String,
    bpe: CoreBPE,
}

impl TiktokenCounter {
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| ChunkError::oracle(model, e))?;
        debug!(model, "loaded tokenizer");
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }
}

impl TokenCounter for TiktokenCounter {
    fn model(&self) -> &str {
        &self.model
    }

    /// Special-token markers in the text are counted as ordinary text
    fn count(&self, text: &str) -> Result<usize> {
        Ok(self.bpe.encode_ordinary(text).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_ada_tokens() {
        let counter = TiktokenCounter::for_model("text-embedding-ada-002").unwrap();
        assert_eq!(counter.model(), "text-embedding-ada-002");
        assert_eq!(counter.count("").unwrap(), 0);
        assert!(counter.count("Hello world.").unwrap() > 0);
    }

    #[test]
    fn test_unknown_model() {
        let err = TiktokenCounter::for_model("no-such-model-xyz").err().unwrap();
        assert!(matches!(err, ChunkError::Oracle { .. }));
    }
}
