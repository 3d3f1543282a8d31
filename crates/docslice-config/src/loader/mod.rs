//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Fixed set of environment-style variables
    Vars(Vec<(String, String)>),
    /// Explicit config object (command-line overrides, tests)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides.
///
/// ```no_run
/// use docslice_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".docslice.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), docslice_config::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// Apply `DOCSLICE_*`-style variables from the given pairs instead of
    /// the process environment
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.sources.push(ConfigSource::Vars(vars));
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result.
    ///
    /// Files and explicit configs are merged field by field (a value equal
    /// to the default leaves the earlier layer in place); environment
    /// variables always overwrite the fields they name.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    config = merge::merge(config, file_config);
                }
                ConfigSource::Environment => {
                    env::apply_vars(&mut config, std::env::vars())?;
                }
                ConfigSource::Vars(vars) => {
                    env::apply_vars(&mut config, vars)?;
                }
                ConfigSource::Explicit(explicit_config) => {
                    config = merge::merge(config, explicit_config);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Files probed by [`Config::load`], first match wins
pub const DEFAULT_PATHS: [&str; 4] = [
    ".docslice.toml",
    ".docslice.yml",
    ".docslice.yaml",
    ".docslice.json",
];

impl Config {
    /// Load from the first default file found in the working directory,
    /// then apply the environment overlay.
    pub fn load() -> Result<Self> {
        Self::builder_with_defaults().build()
    }

    /// Builder pre-seeded with the default file (if any) and the environment
    pub fn builder_with_defaults() -> ConfigBuilder {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.with_file(path);
        }

        builder.with_env()
    }

    /// Load a specific file, then apply the environment overlay
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}
