mod common;

use anyhow::Result;
use common::{CharCounter, WordCounter};
use docslice_config::ChunkingConfig;
use docslice_core::{normalize, BoundaryChunker, TextChunk, TokenEstimator};

/// Rebuild the source from overlapping spans by skipping each shared prefix
fn reconstruct(chunks: &[TextChunk]) -> String {
    let mut out = String::new();
    let mut end = 0usize;
    for chunk in chunks {
        let shared = end.saturating_sub(chunk.char_start);
        out.extend(chunk.text.chars().skip(shared));
        end = chunk.char_end;
    }
    out
}

fn prose() -> String {
    let sentences = [
        "Indexes are a common way to enhance database performance.",
        "An index allows the database server to find and retrieve specific rows much faster than it could do without an index.",
        "But indexes also add overhead to the database system as a whole, so they should be used sensibly.",
        "Suppose we have a table similar to this one, and the application issues many queries of the form shown below.",
        "With no advance preparation, the system would have to scan the entire table row by row to find all matching entries!",
    ];
    let mut text = String::new();
    for round in 0..6 {
        for sentence in sentences {
            text.push_str(sentence);
            text.push(if round % 2 == 0 { ' ' } else { '\n' });
        }
    }
    text
}

#[test]
fn test_chunks_reconstruct_normalized_text() -> Result<()> {
    let text = normalize(&prose());
    for (target, overlap) in [(40, 100), (25, 30), (60, 0), (5, 10)] {
        let config = ChunkingConfig {
            target_tokens: target,
            overlap_chars: overlap,
            ..Default::default()
        };
        let chunks = BoundaryChunker::new(&config, WordCounter).chunk_spans(&text)?;

        assert!(chunks.len() > 1, "target {target} should split the text");
        assert!(chunks.iter().all(|c| !c.text.is_empty()));
        assert_eq!(reconstruct(&chunks), text);
    }
    Ok(())
}

#[test]
fn test_overlap_is_bounded_by_search_window() -> Result<()> {
    let text = normalize(&prose());
    let config = ChunkingConfig {
        target_tokens: 30,
        ..Default::default()
    };
    let chunks = BoundaryChunker::new(&config, WordCounter).chunk_spans(&text)?;

    // the window start may be snapped back by up to the search distance
    let bound = config.overlap_chars + config.max_boundary_search_chars;
    for pair in chunks.windows(2) {
        let shared = pair[0].char_end - pair[1].char_start;
        assert!(shared <= bound, "shared {shared} chars between {pair:?}");
    }
    Ok(())
}

#[test]
fn test_chunks_end_on_sentence_boundaries() -> Result<()> {
    let text = normalize(&prose());
    let config = ChunkingConfig {
        target_tokens: 40,
        max_boundary_search_chars: 150,
        ..Default::default()
    };
    let chunks = BoundaryChunker::new(&config, WordCounter).chunk(&text)?;

    // every sentence is shorter than the search window, so each cut finds one
    for chunk in &chunks[..chunks.len() - 1] {
        let last = chunk.chars().last();
        assert!(matches!(last, Some('.' | '!')), "chunk ends with {last:?}");
    }
    Ok(())
}

#[test]
fn test_flat_text_of_exactly_the_budget_is_one_chunk() -> Result<()> {
    let text = "z".repeat(1000);
    let chunks = BoundaryChunker::new(&ChunkingConfig::default(), CharCounter).chunk(&text)?;
    assert_eq!(chunks, vec![text]);
    Ok(())
}

#[test]
fn test_zero_target_converges_to_start() -> Result<()> {
    let estimator = TokenEstimator::new(CharCounter);
    assert_eq!(estimator.estimate_char_length(&prose(), 0)?, 0);

    let estimator = TokenEstimator::new(WordCounter);
    assert!(estimator.estimate_char_length(&prose(), 0)? <= 1);
    Ok(())
}

#[test]
fn test_normalize_collapses_blank_runs() {
    assert_eq!(normalize("A.\n\n\n\nB."), "A.\n\nB.");
    let text = prose();
    assert_eq!(normalize(&normalize(&text)), normalize(&text));
}
