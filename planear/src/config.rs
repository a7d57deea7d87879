//! Run configuration, read from `planear.toml`.
//!
//! ```toml
//! [execution]
//! parallelism = 4
//!
//! [retry]
//! max_attempts = 5
//! base_delay_ms = 250
//! multiplier = 2
//!
//! [output]
//! color = false
//! plan_path = "out/plan.json"
//! ```
//!
//! Every key is optional.

use planear_exec::{ExecuteConfig, RetryPolicy};
use planear_render::Theme;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "planear.toml";
pub const DEFAULT_PLAN_FILE: &str = "plan.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    pub parallelism: usize,
    pub retry: RetryPolicy,
    /// Colour rendered output with ANSI escapes.
    pub color: bool,
    pub plan_path: PathBuf,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        let execute = ExecuteConfig::default();
        Self {
            parallelism: execute.parallelism,
            retry: execute.retry,
            color: true,
            plan_path: PathBuf::from(DEFAULT_PLAN_FILE),
        }
    }
}

impl ReconcileConfig {
    /// Loads `planear.toml` from the working directory.
    pub fn load() -> Self {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from an explicit path.
    ///
    /// Falls back to defaults when the file is missing (logged at INFO) or
    /// cannot be read or parsed (logged at WARN).
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse config file {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ConfigFile>(contents).map(ConfigFile::into_config)
    }

    pub fn execute_config(&self) -> ExecuteConfig {
        ExecuteConfig {
            parallelism: self.parallelism,
            retry: self.retry,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::with_color(self.color)
    }
}

/// Raw TOML structure matching the planear.toml format.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    execution: ExecutionSection,
    #[serde(default)]
    retry: RetryPolicy,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Deserialize)]
struct ExecutionSection {
    #[serde(default = "default_parallelism")]
    parallelism: usize,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

fn default_parallelism() -> usize {
    ExecuteConfig::default().parallelism
}

#[derive(Deserialize)]
struct OutputSection {
    #[serde(default = "default_color")]
    color: bool,
    #[serde(default = "default_plan_path")]
    plan_path: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            color: default_color(),
            plan_path: default_plan_path(),
        }
    }
}

fn default_color() -> bool {
    true
}

fn default_plan_path() -> PathBuf {
    PathBuf::from(DEFAULT_PLAN_FILE)
}

impl ConfigFile {
    fn into_config(self) -> ReconcileConfig {
        ReconcileConfig {
            parallelism: self.execution.parallelism,
            retry: self.retry,
            color: self.output.color,
            plan_path: self.output.plan_path,
        }
    }
}
