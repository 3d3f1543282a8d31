//! Configuration merging logic
//!
//! A field from `overlay` wins when it differs from the default; otherwise
//! the `base` value is kept.

use crate::{types::*, Config};

pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.tokenizer = merge_tokenizer(base.tokenizer, overlay.tokenizer);
    base.document = merge_document(base.document, overlay.document);
    base.logging = merge_logging(base.logging, overlay.logging);

    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: &T) -> T {
    if overlay != *default {
        overlay
    } else {
        base
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        target_tokens: pick(base.target_tokens, overlay.target_tokens, &default.target_tokens),
        max_boundary_search_chars: pick(
            base.max_boundary_search_chars,
            overlay.max_boundary_search_chars,
            &default.max_boundary_search_chars,
        ),
        overlap_chars: pick(base.overlap_chars, overlay.overlap_chars, &default.overlap_chars),
        sentence_endings: pick(
            base.sentence_endings,
            overlay.sentence_endings,
            &default.sentence_endings,
        ),
        word_breaks: pick(base.word_breaks, overlay.word_breaks, &default.word_breaks),
        parallel_sections: pick(
            base.parallel_sections,
            overlay.parallel_sections,
            &default.parallel_sections,
        ),
    }
}

fn merge_tokenizer(base: TokenizerConfig, overlay: TokenizerConfig) -> TokenizerConfig {
    let default = TokenizerConfig::default();
    TokenizerConfig {
        model: pick(base.model, overlay.model, &default.model),
    }
}

fn merge_document(base: DocumentConfig, overlay: DocumentConfig) -> DocumentConfig {
    let default = DocumentConfig::default();
    DocumentConfig {
        name: pick(base.name, overlay.name, &default.name),
        mode: pick(base.mode, overlay.mode, &default.mode),
        keep_titles: pick(base.keep_titles, overlay.keep_titles, &default.keep_titles),
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    let default = LoggingConfig::default();
    LoggingConfig {
        format: pick(base.format, overlay.format, &default.format),
        level: pick(base.level, overlay.level, &default.level),
    }
}
