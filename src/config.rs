use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::steps::{Binding, StepCell, StepId, StepManager, StepManagerOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to a file instead of stderr
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files, relative to the working directory unless absolute
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    ".stepper/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_log_dir(),
        }
    }
}

/// How the configured current step is bound to the manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindMode {
    /// Ignore `current_step`
    None,
    /// Two-way: transitions write back into the host value
    #[default]
    Mutable,
    /// One-way: the host value is read but never written
    ReadOnly,
}

/// A step group described in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Step names in declaration order; an empty string declares an anonymous step
    #[serde(default = "default_steps")]
    pub steps: Vec<String>,
    /// Stop at the ends instead of wrapping around (default: true)
    #[serde(default = "default_linear")]
    pub linear: bool,
    /// One-shot seed for the first current step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_step: Option<StepId>,
    /// Host value for the current step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepId>,
    #[serde(default)]
    pub bind: BindMode,
}

fn default_steps() -> Vec<String> {
    vec!["first".to_string(), "second".to_string(), "third".to_string()]
}

fn default_linear() -> bool {
    true
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            linear: default_linear(),
            initial_step: None,
            current_step: None,
            bind: BindMode::default(),
        }
    }
}

impl WizardConfig {
    /// Build a manager with the configured steps declared.
    ///
    /// Returns the host cell the manager is bound to, if any, so callers can
    /// inspect or change the bound value.
    pub fn build_manager(&self) -> Result<(StepManager, Option<StepCell>)> {
        let host = match self.bind {
            BindMode::None => None,
            BindMode::Mutable | BindMode::ReadOnly => Some(StepCell::new(self.current_step.clone())),
        };
        let current_step = match (self.bind, &host) {
            (BindMode::Mutable, Some(cell)) => Binding::mutable(cell),
            (BindMode::ReadOnly, Some(cell)) => Binding::read_only(cell),
            _ => Binding::Absent,
        };

        let mut manager = StepManager::new(StepManagerOptions {
            current_step,
            initial_step: self.initial_step.clone(),
            linear: self.linear,
        });

        let mut cycle = manager.begin_cycle();
        for name in &self.steps {
            cycle.step(Some(name.as_str()));
        }
        cycle.finish().context("Invalid step declarations in configuration")?;

        Ok((manager, host))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            wizard: WizardConfig::default(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("stepper.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so stepper works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // User config in ~/.config/stepper/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stepper").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with STEPPER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("STEPPER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to the logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}
