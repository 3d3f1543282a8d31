use crate::error::Result;

/// Token-counting oracle.
///
/// Implementations must be deterministic for a fixed (model, text) pair;
/// the estimator relies on it to binary-search a cut offset.
pub trait TokenCounter: Send + Sync {
    /// Identifier of the model whose tokenization is being counted
    fn model(&self) -> &str;

    fn count(&self, text: &str) -> Result<usize>;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn model(&self) -> &str {
        (**self).model()
    }

    fn count(&self, text: &str) -> Result<usize> {
        (**self).count(text)
    }
}
