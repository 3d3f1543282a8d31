use super::estimator::TokenEstimator;
use crate::error::Result;
use crate::models::TextChunk;
use crate::traits::TokenCounter;
use docslice_config::ChunkingConfig;
use tracing::debug;

/// Splits text into overlapping windows sized by a token budget.
///
/// Each window end is located by [`TokenEstimator`] and then moved forward to
/// a sentence ending (or back to the last word break seen) within
/// `max_boundary_search_chars`. Window starts are snapped backward the same
/// way, so consecutive windows share roughly `overlap_chars` characters.
pub struct BoundaryChunker<C> {
    estimator: TokenEstimator<C>,
    target_tokens: usize,
    max_search: usize,
    overlap: usize,
    sentence_endings: Vec<char>,
    word_breaks: Vec<char>,
}

impl<C: TokenCounter> BoundaryChunker<C> {
    pub fn new(config: &ChunkingConfig, counter: C) -> Self {
        Self {
            estimator: TokenEstimator::new(counter),
            target_tokens: config.target_tokens,
            max_search: config.max_boundary_search_chars,
            overlap: config.overlap_chars,
            sentence_endings: config.sentence_endings.clone(),
            word_breaks: config.word_breaks.clone(),
        }
    }

    pub fn counter(&self) -> &C {
        self.estimator.counter()
    }

    /// Chunk bodies in document order
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .chunk_spans(text)?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect())
    }

    /// Chunks with their character spans.
    ///
    /// Spans are ordered, never empty, and each starts after the start and at
    /// or before the end of the previous one, so together they cover the
    /// whole text. Only entirely blank text yields no spans.
    pub fn chunk_spans(&self, text: &str) -> Result<Vec<TextChunk>> {
        let chars: Vec<char> = text.chars().collect();
        let bytes: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let length = chars.len();

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut covered = 0;
        let mut cursor = 0;

        while cursor + self.overlap < length {
            let n_chars = self
                .estimator
                .estimate_char_length(&text[bytes[cursor]..], self.target_tokens)?;
            let end = self.snap_end(&chars, cursor + n_chars);
            let start = self.snap_start(&chars, cursor).min(covered);

            // a window that adds nothing past `covered` would be a duplicate
            if start < end && end > covered {
                push_or_extend(&mut chunks, text, &bytes, start, end);
                covered = end;
            }

            cursor = end.saturating_sub(self.overlap).max(cursor + 1);
        }

        // Text no longer than the overlap never enters the loop, and a stalled
        // cursor can leave a tail behind the last window.
        if covered < length && !text.trim().is_empty() {
            push_or_extend(&mut chunks, text, &bytes, cursor.min(covered), length);
        }

        debug!(
            chars = length,
            chunks = chunks.len(),
            model = self.counter().model(),
            "chunked text"
        );

        Ok(chunks)
    }

    fn is_sentence_end(&self, c: char) -> bool {
        self.sentence_endings.contains(&c)
    }

    fn is_word_break(&self, c: char) -> bool {
        self.word_breaks.contains(&c)
    }

    /// Move a tentative cut forward to the next sentence ending, or back to
    /// the last word break when none is in reach. The character at the cut is
    /// kept in the chunk.
    fn snap_end(&self, chars: &[char], tentative: usize) -> usize {
        let length = chars.len();
        if tentative >= length {
            return length;
        }

        let limit = tentative + self.max_search;
        let mut end = tentative;
        let mut last_word: Option<usize> = None;

        while end < length && end < limit && !self.is_sentence_end(chars[end]) {
            if self.is_word_break(chars[end]) {
                last_word = Some(end);
            }
            end += 1;
        }

        if end < length && !self.is_sentence_end(chars[end]) {
            if let Some(word) = last_word.filter(|w| *w > 0) {
                end = word;
            }
        }

        if end < length {
            end += 1;
        }
        end
    }

    /// Move a window start back to just after a sentence ending, or just
    /// after the furthest word break seen, within the search window.
    fn snap_start(&self, chars: &[char], origin: usize) -> usize {
        let floor = origin.saturating_sub(self.max_search);
        let mut start = origin;
        let mut last_word: Option<usize> = None;

        while start > 0 && start > floor && !self.is_sentence_end(chars[start]) {
            if self.is_word_break(chars[start]) {
                last_word = Some(start);
            }
            start -= 1;
        }

        if !self.is_sentence_end(chars[start]) {
            if let Some(word) = last_word.filter(|w| *w > 0) {
                start = word;
            }
        }

        if start > 0 {
            start += 1;
        }
        start
    }
}

/// Append the span `start..end`, or widen the last chunk when the span
/// would swallow it whole
fn push_or_extend(chunks: &mut Vec<TextChunk>, text: &str, bytes: &[usize], start: usize, end: usize) {
    match chunks.last_mut() {
        Some(last) if start <= last.char_start => {
            last.text = text[bytes[last.char_start]..bytes[end]].to_string();
            last.char_end = end;
        }
        _ => chunks.push(TextChunk {
            index: chunks.len(),
            text: text[bytes[start]..bytes[end]].to_string(),
            char_start: start,
            char_end: end,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per character
    struct CharCounter;

    impl TokenCounter for CharCounter {
        fn model(&self) -> &str {
            "chars"
        }

        fn count(&self, text: &str) -> Result<usize> {
            Ok(text.chars().count())
        }
    }

    fn chunker(target_tokens: usize, search: usize, overlap: usize) -> BoundaryChunker<CharCounter> {
        let config = ChunkingConfig {
            target_tokens,
            max_boundary_search_chars: search,
            overlap_chars: overlap,
            ..Default::default()
        };
        BoundaryChunker::new(&config, CharCounter)
    }

    fn assert_covers(text: &str, chunks: &[TextChunk]) {
        let length = text.chars().count();
        assert_eq!(chunks.first().map(|c| c.char_start), Some(0));
        assert_eq!(chunks.last().map(|c| c.char_end), Some(length));
        for pair in chunks.windows(2) {
            assert!(pair[1].char_start <= pair[0].char_end, "gap between {pair:?}");
            assert!(pair[1].char_start > pair[0].char_start, "nested spans {pair:?}");
            assert!(pair[1].char_end > pair[0].char_end, "no progress in {pair:?}");
        }
        for chunk in chunks {
            let expected: String = text
                .chars()
                .skip(chunk.char_start)
                .take(chunk.char_end - chunk.char_start)
                .collect();
            assert_eq!(chunk.text, expected);
        }
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(chunker(1000, 100, 100).chunk("").unwrap().is_empty());
    }

    #[test]
    fn test_text_shorter_than_overlap_is_one_chunk() {
        let chunks = chunker(1000, 100, 100).chunk("Hello world.").unwrap();
        assert_eq!(chunks, vec!["Hello world."]);
    }

    #[test]
    fn test_whitespace_only_short_text_yields_nothing() {
        assert!(chunker(1000, 100, 100).chunk(" \n ").unwrap().is_empty());
    }

    #[test]
    fn test_budget_sized_text_without_breaks_is_one_chunk() {
        let text = "x".repeat(1000);
        let chunks = chunker(1000, 100, 100).chunk(&text).unwrap();
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_cut_moves_forward_to_sentence_end() {
        // tentative cut at 10 lands mid-sentence; the period sits at 14
        let text = format!("aaaa bbbb cccc. {}", "d".repeat(40));
        let spans = chunker(10, 20, 5).chunk_spans(&text).unwrap();
        assert_eq!(spans[0].text, "aaaa bbbb cccc.");
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_cut_falls_back_to_word_break() {
        // no sentence ending within reach: the last space seen wins
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj";
        let spans = chunker(10, 8, 3).chunk_spans(text).unwrap();
        assert_eq!(spans[0].text, "aaaa bbbb cccc ");
        assert_covers(text, &spans);
    }

    #[test]
    fn test_hard_cut_without_any_break() {
        let text = "y".repeat(50);
        let spans = chunker(10, 5, 2).chunk_spans(&text).unwrap();
        // tentative 10, scan 5 chars, keep the character at the cut
        assert_eq!(spans[0].char_end, 16);
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_full_width_sentence_endings() {
        let text = "これは最初の文です。これは二番目の文です。これは三番目の文です。";
        let spans = chunker(8, 10, 3).chunk_spans(text).unwrap();
        assert!(spans.len() > 1);
        assert!(spans[0].text.ends_with('。'));
        assert_covers(text, &spans);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let spans = chunker(60, 30, 15).chunk_spans(&text).unwrap();
        assert!(spans.len() > 2);
        for pair in spans.windows(2) {
            assert!(pair[1].char_start < pair[0].char_end);
        }
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_zero_overlap_still_covers() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta. Eta theta. Iota kappa.".repeat(4);
        let spans = chunker(20, 10, 0).chunk_spans(&text).unwrap();
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_tiny_budget_terminates() {
        let text = "a b c d e f g h i j k l m n o p q r s t u v w x y z".repeat(3);
        let spans = chunker(1, 2, 10).chunk_spans(&text).unwrap();
        assert!(!spans.is_empty());
        assert!(spans.iter().all(|c| !c.text.is_empty()));
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_trailing_whitespace_is_kept() {
        let text = format!("{}   ", "x".repeat(56));
        let spans = chunker(1, 1, 3).chunk_spans(&text).unwrap();
        assert_covers(&text, &spans);
        assert!(spans.last().unwrap().text.ends_with("   "));
    }

    #[test]
    fn test_small_parameters_always_cover() {
        let texts = [
            format!("{}   ", "x".repeat(56)),
            "Short one. Then a longer sentence follows, with commas; and more.  \n \n".to_string(),
            "a.b.c.d.e.f.g.h.i.j.k.l.m.n.o.p".to_string(),
            "word word word\n\nword word word word\t word".to_string(),
            "終わり。次の文、そして（括弧）も。  ".to_string(),
            "  x  ".to_string(),
        ];
        for text in &texts {
            for target in 1..=6 {
                for search in 1..=6 {
                    for overlap in 0..=6 {
                        let spans = chunker(target, search, overlap)
                            .chunk_spans(text)
                            .unwrap();
                        assert_covers(text, &spans);
                        for (i, chunk) in spans.iter().enumerate() {
                            assert_eq!(chunk.index, i);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let text = "Sentence one. Sentence two. Sentence three. ".repeat(10);
        let spans = chunker(40, 20, 10).chunk_spans(&text).unwrap();
        for (i, chunk) in spans.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }
}
