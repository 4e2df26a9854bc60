//! Run configuration loaded from `simp.toml`

use crate::error::{CompileError, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "simp.toml";

/// Default limit on nested function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// What the evaluator does with a recoverable runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Report the error, yield 0 for the failing node, and keep going
    #[default]
    BestEffort,
    /// Stop at the first error
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    pub error_policy: ErrorPolicy,
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            error_policy: ErrorPolicy::default(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| CompileError::config(e.message().to_string()))?;
        if config.max_call_depth == 0 {
            return Err(CompileError::config("max-call-depth must be at least 1"));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
            .map_err(|e| CompileError::config(format!("{}: {}", path.display(), e.message())))
    }

    /// Load an explicit config file, else `./simp.toml` if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
