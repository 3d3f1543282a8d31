//! Environment variable configuration overlay
//!
//! Supports variables of the form `DOCSLICE_<section>_<field>=value`:
//! - `DOCSLICE_CHUNKING_TARGET_TOKENS=500`
//! - `DOCSLICE_DOCUMENT_MODE=plain`
//! - `DOCSLICE_LOGGING_LEVEL=debug`
//!
//! Two unprefixed variables are honoured as well: `AZURE_OPENAI_MODEL`
//! (tokenizer model) and `DOCUMENT_NAME` (breadcrumb document name).

use crate::{error::ConfigError, types::*, Config, Result};

const PREFIX: &str = "DOCSLICE_";
const MODEL_VAR: &str = "AZURE_OPENAI_MODEL";
const DOCUMENT_NAME_VAR: &str = "DOCUMENT_NAME";

/// Parse configuration from an explicit set of variables.
///
/// Returns `None` when none of the recognised variables are present.
pub fn from_vars<I>(vars: I) -> Result<Option<Config>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = Config::default();
    let found_any = apply_vars(&mut config, vars)?;
    Ok(found_any.then_some(config))
}

/// Overwrite fields of `config` with every recognised variable, including
/// values equal to the defaults. Returns whether any variable was applied.
pub fn apply_vars<I>(config: &mut Config, vars: I) -> Result<bool>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut found_any = false;

    for (key, value) in vars {
        if key == MODEL_VAR {
            config.tokenizer.model = value;
        } else if key == DOCUMENT_NAME_VAR {
            config.document.name = value;
        } else if let Some(stripped) = key.strip_prefix(PREFIX) {
            apply_env_var(config, stripped, &value)?;
        } else {
            continue;
        }
        found_any = true;
    }

    Ok(found_any)
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: format!("{PREFIX}{key}"),
            message: "Expected format: DOCSLICE_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "tokenizer" => apply_tokenizer_var(&mut config.tokenizer, &field, value),
        "document" => apply_document_var(&mut config.document, &field, value),
        "logging" => apply_logging_var(&mut config.logging, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: format!("{PREFIX}{key}"),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn var_name(section: &str, field: &str) -> String {
    format!("{PREFIX}{}_{}", section.to_uppercase(), field.to_uppercase())
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_usize(section: &str, field: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: var_name(section, field),
        message: format!("Invalid integer: {}", value),
    })
}

fn parse_bool(section: &str, field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarError {
            var: var_name(section, field),
            message: format!("Invalid boolean: {}", value),
        }),
    }
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "target_tokens" => config.target_tokens = parse_usize("chunking", field, value)?,
        "max_boundary_search_chars" => {
            config.max_boundary_search_chars = parse_usize("chunking", field, value)?
        }
        "overlap_chars" => config.overlap_chars = parse_usize("chunking", field, value)?,
        // every character of the value is one break character
        "sentence_endings" => config.sentence_endings = value.chars().collect(),
        "word_breaks" => config.word_breaks = value.chars().collect(),
        "parallel_sections" => config.parallel_sections = parse_bool("chunking", field, value)?,
        _ => return Err(unknown_field("chunking", field)),
    }
    Ok(())
}

fn apply_tokenizer_var(config: &mut TokenizerConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        _ => return Err(unknown_field("tokenizer", field)),
    }
    Ok(())
}

fn apply_document_var(config: &mut DocumentConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "name" => config.name = value.to_string(),
        "mode" => config.mode = value.parse()?,
        "keep_titles" => config.keep_titles = parse_bool("document", field, value)?,
        _ => return Err(unknown_field("document", field)),
    }
    Ok(())
}

fn apply_logging_var(config: &mut LoggingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "level" => {
            config.level = LogLevel::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("logging.level", value, &LogLevel::VARIANTS)
            })?
        }
        "format" => {
            config.format = match value.to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "logging.format",
                        value,
                        &["text", "json"],
                    ))
                }
            }
        }
        _ => return Err(unknown_field("logging", field)),
    }
    Ok(())
}
