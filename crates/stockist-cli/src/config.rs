//! Persisted default settings (`~/.stockistconfig`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file name under the home directory
pub const CONFIG_FILE_NAME: &str = ".stockistconfig";

/// Store used when neither `--database` nor a stored default names one
pub const DEFAULT_DATABASE: &str = ".stockist.db";

/// Stored defaults, OR-ed with the global flags at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub database: String,
    pub verbose: bool,
    pub debug: bool,
    pub silent: bool,
    pub lock: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            verbose: false,
            debug: false,
            silent: false,
            lock: false,
        }
    }
}

impl Defaults {
    /// Update one key from user input
    ///
    /// Flag keys take `true` or `false` (any case).
    ///
    /// # Errors
    ///
    /// Fails for an unknown key or a non-boolean flag value.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "database" => self.database = value.to_string(),
            "verbose" => self.verbose = parse_flag(value)?,
            "debug" => self.debug = parse_flag(value)?,
            "silent" => self.silent = parse_flag(value)?,
            "lock" => self.lock = parse_flag(value)?,
            _ => bail!("Invalid name."),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("database", self.database.clone()),
            ("verbose", self.verbose.to_string()),
            ("debug", self.debug.to_string()),
            ("silent", self.silent.to_string()),
            ("lock", self.lock.to_string()),
        ]
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Invalid value."),
    }
}

/// The settings file on disk
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `--config` if given, else `~/.stockistconfig`
    ///
    /// # Errors
    ///
    /// Fails if no home directory can be determined.
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_path()
                .map(Self::new)
                .context("No home directory for the config file"),
        }
    }

    fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored defaults; a missing file yields the built-in defaults
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Defaults> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Config file does not yet exist");
            return Ok(Defaults::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn save(&self, defaults: &Defaults) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(defaults)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = ?self.path, "Config file saved");
        Ok(())
    }

    /// Truncate the file so every key falls back to its built-in default
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn reset(&self) -> Result<()> {
        fs::write(&self.path, "")
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
