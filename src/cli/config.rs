//! Configuration file
//!
//! A JSON document; every field is optional. A missing file means all
//! defaults. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::batch::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_WORKERS, DEFAULT_OUTPUT_EXTENSION};
use crate::http_server::HttpServerConfig;
use crate::layout::ValidationMode;
use crate::render::RenderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Specification store directory
    #[serde(default = "default_spec_dir")]
    pub spec_dir: PathBuf,

    /// Templates directory; the built-in page when absent
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Trace logging and debug comments in generated pages
    #[serde(default)]
    pub debug: bool,

    /// Stop validation at the first violation
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_spec_dir() -> PathBuf {
    PathBuf::from("./specs")
}
fn default_output_extension() -> String {
    DEFAULT_OUTPUT_EXTENSION.to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec_dir: default_spec_dir(),
            templates_dir: None,
            output_extension: default_output_extension(),
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
            debug: false,
            strict: false,
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads and validates `path`; defaults when the file does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.batch_size == 0 {
            return Err(CliError::config_error("batch_size must be > 0"));
        }

        if self.max_workers == 0 {
            return Err(CliError::config_error("max_workers must be > 0"));
        }

        if self.output_extension.is_empty()
            || !self.output_extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(CliError::config_error(format!(
                "Invalid output_extension: '{}'. Use letters and digits only.",
                self.output_extension
            )));
        }

        Ok(())
    }

    /// Renderer settings, with `templates` overriding the file value.
    pub fn render_config(&self, templates: Option<PathBuf>) -> RenderConfig {
        RenderConfig {
            templates_dir: templates.or_else(|| self.templates_dir.clone()),
            debug: self.debug,
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        if self.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Collect
        }
    }
}
