mod args;
mod logging;
mod report;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use docslice_config::{Config, ConfigBuilder, ErrorFormatter, Validate};
use docslice_core::{read_document, DocumentPreprocessor};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    logging::init(&config.logging)?;
    debug!(?config, "loaded configuration");

    let content = read_document(&cli.file)?;
    let preprocessor = DocumentPreprocessor::from_config(config)
        .context("failed to initialise the tokenizer")?;
    let chunks = preprocessor
        .create_chunks(&content)
        .with_context(|| format!("failed to chunk {}", cli.file.display()))?;

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        report::write_json(&mut stdout, &preprocessor, &chunks)?;
    } else {
        let preview = cli
            .preview
            .unwrap_or_else(|| report::default_preview(preprocessor.config().document.mode));
        report::write_report(&mut stdout, &cli.file, &preprocessor, &chunks, preview)?;
    }

    Ok(())
}

/// Defaults, then the config file (given or probed), then the environment,
/// then command-line flags
fn load_config(cli: &Cli) -> Result<Config> {
    let builder = match &cli.config {
        Some(path) => ConfigBuilder::new().with_file(path).with_env(),
        None => Config::builder_with_defaults(),
    };

    let mut config = builder
        .build()
        .map_err(|e| anyhow::anyhow!(ErrorFormatter::new(&e).format()))?;
    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(ErrorFormatter::new(&e).format()))?;

    Ok(config)
}
