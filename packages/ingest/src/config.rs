//! Run configuration.
//!
//! A [`LedgerConfig`] is resolved once at startup from, in increasing
//! precedence: built-in defaults, an optional TOML file, environment
//! variables, and command-line flags. The resolved value is passed
//! explicitly into [`crate::run`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory scanned for statements when nothing else is configured.
pub const DEFAULT_SOURCE_DIRECTORY: &str = "./pdfs";

/// Workbook updated when nothing else is configured.
pub const DEFAULT_LEDGER_PATH: &str = "./Cálculo.v15 - Poupança - Preenchido.xlsx";

/// Overrides [`LedgerConfig::source_directory`].
pub const SOURCE_DIRECTORY_ENV: &str = "PAYROLL_LEDGER_SOURCE_DIR";

/// Overrides [`LedgerConfig::ledger_path`].
pub const LEDGER_PATH_ENV: &str = "PAYROLL_LEDGER_PATH";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Location of the config file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`LedgerConfig`].
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Where statements are read from and which workbook they are merged into.
///
/// Keys missing from a TOML file keep their defaults:
///
/// ```toml
/// source_directory = "./pdfs"
/// ledger_path = "./ledger.xlsx"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory scanned (non-recursively) for `.pdf` files.
    pub source_directory: PathBuf,
    /// Pre-existing workbook that receives one sheet per competence year.
    pub ledger_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            source_directory: PathBuf::from(DEFAULT_SOURCE_DIRECTORY),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
        }
    }
}

impl LedgerConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid TOML or has
    /// fields of the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded config from {}", path.display());

        Self::from_toml_str(&contents)
    }

    /// Applies [`SOURCE_DIRECTORY_ENV`] and [`LEDGER_PATH_ENV`] from the
    /// process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides using `lookup` in place of the
    /// process environment. Empty values are ignored.
    #[must_use]
    pub fn with_env_from(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let from_env = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        self.with_overrides(from_env(SOURCE_DIRECTORY_ENV), from_env(LEDGER_PATH_ENV))
    }

    /// Replaces each field for which an override is given.
    #[must_use]
    pub fn with_overrides(
        mut self,
        source_directory: Option<PathBuf>,
        ledger_path: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = source_directory {
            self.source_directory = dir;
        }
        if let Some(path) = ledger_path {
            self.ledger_path = path;
        }
        self
    }

    /// Resolves the full precedence chain: defaults, then `config_file`
    /// (if any), then the environment, then the given flag values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config_file` is given but cannot be
    /// loaded.
    pub fn resolve(
        config_file: Option<&Path>,
        source_directory: Option<PathBuf>,
        ledger_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let base = match config_file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        Ok(base
            .with_env()
            .with_overrides(source_directory, ledger_path))
    }
}
