use anyhow::Result;
use docslice_config::ChunkMode;
use docslice_core::{DocumentPreprocessor, TokenCounter};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const DELIMITER: &str = "\n========================================\n";

pub fn default_preview(mode: ChunkMode) -> usize {
    match mode {
        ChunkMode::Plain => 50,
        ChunkMode::Hierarchical => 200,
    }
}

/// First `chars` characters on one line
fn preview(chunk: &str, chars: usize) -> String {
    chunk
        .chars()
        .take(chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// `Processing:` header, one `index:tokens:preview` line per chunk, then the
/// chunks themselves joined by [`DELIMITER`]
pub fn write_report<W: Write, C: TokenCounter>(
    out: &mut W,
    file: &Path,
    preprocessor: &DocumentPreprocessor<C>,
    chunks: &[String],
    preview_chars: usize,
) -> Result<()> {
    writeln!(out, "Processing: {}", file.display())?;
    for (i, chunk) in chunks.iter().enumerate() {
        let tokens = preprocessor.count_tokens(chunk)?;
        writeln!(out, "{}:{}:{}", i, tokens, preview(chunk, preview_chars))?;
    }
    writeln!(out, "{}", chunks.join(DELIMITER))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonChunk<'a> {
    index: usize,
    tokens: usize,
    text: &'a str,
}

pub fn write_json<W: Write, C: TokenCounter>(
    out: &mut W,
    preprocessor: &DocumentPreprocessor<C>,
    chunks: &[String],
) -> Result<()> {
    let mut entries = Vec::with_capacity(chunks.len());
    for (index, text) in chunks.iter().enumerate() {
        entries.push(JsonChunk {
            index,
            tokens: preprocessor.count_tokens(text)?,
            text,
        });
    }

    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}
