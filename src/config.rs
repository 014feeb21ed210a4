//! Generator configuration
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults (`.`, `public`, `up.sql`/`down.sql`, [`DEFAULT_TYPES`])
//! 2. `ARG_MINMAX_OUT_DIR` / `ARG_MINMAX_SCHEMA` environment variables
//! 3. A YAML file passed with `--config`
//! 4. Command-line flags
//!
//! [`DEFAULT_TYPES`]: crate::roster::DEFAULT_TYPES

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{GeneratorError, Result};
use crate::generator::{Generator, DEFAULT_SCHEMA};
use crate::roster::TypeRoster;
use crate::writer::{ArtifactWriter, DOWN_FILE, UP_FILE};

pub const OUT_DIR_ENV: &str = "ARG_MINMAX_OUT_DIR";
pub const SCHEMA_ENV: &str = "ARG_MINMAX_SCHEMA";

/// Everything one generation run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory receiving both artifacts
    pub out_dir: PathBuf,
    /// Schema the preamble points `search_path` at
    pub schema: String,
    pub up_file: String,
    pub down_file: String,
    /// Types to instantiate, in output order
    pub types: TypeRoster,
}

/// Keys accepted in a YAML config file; absent keys leave lower layers alone
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    out_dir: Option<PathBuf>,
    schema: Option<String>,
    up_file: Option<String>,
    down_file: Option<String>,
    types: Option<TypeRoster>,
}

/// Command-line layer; `None` or an empty type list means "not given"
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub schema: Option<String>,
    pub types: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }
}

impl GeneratorConfig {
    /// Built-in defaults overlaid with whatever `lookup` finds for the
    /// environment keys
    pub fn from_env_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            out_dir: lookup(OUT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            schema: lookup(SCHEMA_ENV).unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            up_file: UP_FILE.to_string(),
            down_file: DOWN_FILE.to_string(),
            types: TypeRoster::default(),
        }
    }

    /// Parse a YAML document; absent keys keep their defaults
    ///
    /// ```yaml
    /// out_dir: migrations/2024-01-05-000000_arg_min_max
    /// schema: public
    /// types: [int4, int8, numeric]
    /// ```
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        Self::default().with_yaml_str(content, origin)
    }

    /// Load a YAML config file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        Self::default().with_yaml_file(path)
    }

    /// Resolve all layers against the process environment
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve defaults, environment, config file and command line, in that
    /// order of increasing precedence
    pub fn resolve_with(
        overrides: &ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::from_env_lookup(lookup);
        if let Some(path) = &overrides.config {
            config = config.with_yaml_file(path)?;
        }

        if let Some(dir) = &overrides.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(schema) = &overrides.schema {
            config.schema = schema.clone();
        }
        if !overrides.types.is_empty() {
            config.types = TypeRoster::from_names(overrides.types.iter().cloned())?;
        }

        Ok(config)
    }

    /// Generator for the configured schema
    pub fn generator(&self) -> Result<Generator> {
        Ok(Generator::new(self.schema.clone())?)
    }

    /// Writer for the configured output location
    pub fn writer(&self) -> ArtifactWriter {
        ArtifactWriter::new(&self.out_dir).with_file_names(&self.up_file, &self.down_file)
    }

    fn with_yaml_file(self, path: &Path) -> Result<Self> {
        info!("Loading generator configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.with_yaml_str(&content, path)
    }

    fn with_yaml_str(mut self, content: &str, origin: &Path) -> Result<Self> {
        let invalid = |message: String| GeneratorError::Config {
            path: origin.to_path_buf(),
            message,
        };

        let file: ConfigFile = serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if let Some(out_dir) = file.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(schema) = file.schema {
            self.schema = schema;
        }
        if let Some(up_file) = file.up_file {
            self.up_file = up_file;
        }
        if let Some(down_file) = file.down_file {
            self.down_file = down_file;
        }
        if let Some(types) = file.types {
            self.types = types;
        }

        if self.up_file == self.down_file {
            return Err(invalid(format!(
                "up_file and down_file are both '{}'",
                self.up_file
            )));
        }
        Ok(self)
    }
}
