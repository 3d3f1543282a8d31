//! Document handling configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a document is turned into chunks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkMode {
    /// Whole document text, no heading breadcrumbs
    Plain,
    /// One logical section per chapter/sect1/sect2 leaf, breadcrumbs prepended
    #[default]
    Hierarchical,
}

impl ChunkMode {
    pub const VARIANTS: [&'static str; 2] = ["plain", "hierarchical"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Hierarchical => "hierarchical",
        }
    }
}

impl fmt::Display for ChunkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkMode {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "hierarchical" => Ok(Self::Hierarchical),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "document.mode",
                s,
                &Self::VARIANTS,
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Display name used for the top-level `#` breadcrumb
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub mode: ChunkMode,

    /// Keep section titles inside section text. When off, the titles only
    /// appear in the breadcrumb.
    #[serde(default = "default_keep_titles")]
    pub keep_titles: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            mode: ChunkMode::default(),
            keep_titles: default_keep_titles(),
        }
    }
}

impl crate::validation::Validate for DocumentConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_non_empty("document.name", &self.name)
    }
}

fn default_name() -> String {
    "Document".to_string()
}

fn default_keep_titles() -> bool {
    true
}
