use clap::{Parser, ValueEnum};
use docslice_config::{ChunkMode, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docslice")]
#[command(about = "Split DocBook/SGML manuals into token-bounded chunks for embedding")]
pub struct Cli {
    /// Document to chunk
    pub file: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chunking mode
    #[arg(long, value_enum)]
    pub mode: Option<CliChunkMode>,

    /// Tokenizer model used to count tokens
    #[arg(long)]
    pub model: Option<String>,

    /// Document name for the top-level breadcrumb
    #[arg(long)]
    pub document_name: Option<String>,

    /// Token budget per chunk
    #[arg(long)]
    pub target_tokens: Option<usize>,

    /// Leave section titles out of the chunk text (they stay in the breadcrumb)
    #[arg(long, default_value_t = false)]
    pub strip_titles: bool,

    /// Characters of each chunk shown in the report [default: 50 plain, 200 hierarchical]
    #[arg(long)]
    pub preview: Option<usize>,

    /// Print chunks as a JSON array instead of the report
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliChunkMode {
    Plain,
    Hierarchical,
}

impl From<CliChunkMode> for ChunkMode {
    fn from(mode: CliChunkMode) -> Self {
        match mode {
            CliChunkMode::Plain => ChunkMode::Plain,
            CliChunkMode::Hierarchical => ChunkMode::Hierarchical,
        }
    }
}

impl Cli {
    /// Overwrite config fields with every flag that was given
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.document.mode = mode.into();
        }
        if let Some(model) = &self.model {
            config.tokenizer.model = model.clone();
        }
        if let Some(name) = &self.document_name {
            config.document.name = name.clone();
        }
        if let Some(target) = self.target_tokens {
            config.chunking.target_tokens = target;
        }
        if self.strip_titles {
            config.document.keep_titles = false;
        }
    }
}
