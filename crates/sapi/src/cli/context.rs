//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use sapi_config::{CONFIG_FILENAME, Config};
use sapi_index::Index;
use tracing::debug;

use super::args::Commands;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Configuration file given with `--config`, if any.
    pub config_override: Option<PathBuf>,
    /// Loaded configuration (default if no config file was found or loaded).
    pub config: Config,
}

impl CommandContext {
    /// Builds the context a command needs, loading configuration only when required.
    pub fn for_command(command: &Commands, config_override: Option<&Path>) -> Result<Self, ExitCode> {
        if command.needs_config() {
            Self::load(config_override)
        } else {
            Self::load_cwd_only(config_override)
        }
    }

    /// Loads the current directory and configuration.
    ///
    /// An explicit `--config` file must exist; otherwise the nearest `.sapi.toml`
    /// is used, falling back to defaults.
    pub fn load(config_override: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd, config_override)?;
        match &config.config_path {
            Some(path) => debug!(path = %path.display(), "loaded configuration"),
            None => debug!("no configuration file found, using defaults"),
        }
        Ok(Self {
            cwd,
            config_override: config_override.map(Path::to_path_buf),
            config,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only(config_override: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config_override: config_override.map(Path::to_path_buf),
            config: Config::default(),
        })
    }

    /// Returns the configuration file `init` should write.
    pub fn config_target(&self) -> PathBuf {
        match &self.config_override {
            Some(path) => self.cwd.join(path),
            None => self.cwd.join(CONFIG_FILENAME),
        }
    }

    /// Builds and validates the index definition from the configuration.
    pub fn index(&self) -> Result<Index, ExitCode> {
        let index = Index::from_config(&self.config).map_err(|e| {
            eprintln!("error: invalid index definition: {e}");
            ExitCode::FAILURE
        })?;
        index.validate().map_err(|e| {
            eprintln!("error: invalid index definition: {e}");
            ExitCode::FAILURE
        })?;
        Ok(index)
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the override file or by discovery from `cwd`.
fn load_config_or_failure(cwd: &Path, config_override: Option<&Path>) -> Result<Config, ExitCode> {
    let loaded = match config_override {
        Some(path) => Config::load_file(&cwd.join(path)),
        None => Config::load(cwd),
    };
    loaded.map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
