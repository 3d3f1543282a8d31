use crate::error::Result;
use crate::traits::TokenCounter;
use std::cmp::Ordering;
use tracing::trace;

/// Locates the character offset at which a text prefix reaches a token budget.
///
/// Tokenizer boundaries are not monotone in character offsets, so the search
/// only promises an offset whose prefix is close to the target.
pub struct TokenEstimator<C> {
    counter: C,
}

impl<C: TokenCounter> TokenEstimator<C> {
    pub fn new(counter: C) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Binary search over `0..=chars(text)` for a prefix of `target_tokens`
    /// tokens. Returns a character (not byte) offset.
    ///
    /// An exact token match returns immediately; otherwise the midpoint of
    /// the exhausted search range is returned. Costs O(log n) oracle calls.
    pub fn estimate_char_length(&self, text: &str, target_tokens: usize) -> Result<usize> {
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        let mut low: isize = 0;
        let mut high: isize = char_len as isize;
        let mut probes = 0usize;

        while low <= high {
            let mid = (low + high) / 2;
            let n_tokens = self.counter.count(&text[..boundaries[mid as usize]])?;
            probes += 1;

            match n_tokens.cmp(&target_tokens) {
                Ordering::Equal => {
                    trace!(probes, offset = mid, "exact token match");
                    return Ok(mid as usize);
                }
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid - 1,
            }
        }

        let offset = ((low + high) / 2).clamp(0, char_len as isize) as usize;
        trace!(probes, offset, target_tokens, "approximate token match");
        Ok(offset)
    }
}
