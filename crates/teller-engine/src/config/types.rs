//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use teller_engine::TellerConfig;
///
/// let config = TellerConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.paths.clients_file, "CLIENTS.txt");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TellerConfig {
    /// Enable debug mode (verbose logging, diagnostics).
    pub debug: bool,

    /// Path configuration.
    pub paths: PathsConfig,

    /// UI configuration.
    pub ui: UiConfig,

    /// Prompt configuration.
    pub prompt: PromptConfig,
}

impl TellerConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default. This enables layered configuration.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.paths.merge(&other.paths);
        self.ui.merge(&other.ui);
        self.prompt.merge(&other.prompt);
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the record files.
    pub data_dir: PathBuf,

    /// Client record file name, relative to `data_dir`.
    pub clients_file: String,

    /// User record file name, relative to `data_dir`.
    pub users_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            clients_file: "CLIENTS.txt".into(),
            users_file: "USERS.txt".into(),
        }
    }
}

impl PathsConfig {
    /// Full path to the client record file.
    #[must_use]
    pub fn clients_path(&self) -> PathBuf {
        self.data_dir.join(&self.clients_file)
    }

    /// Full path to the user record file.
    #[must_use]
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.data_dir != default.data_dir {
            self.data_dir = other.data_dir.clone();
        }
        if other.clients_file != default.clients_file {
            self.clients_file = other.clients_file.clone();
        }
        if other.users_file != default.users_file {
            self.users_file = other.users_file.clone();
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Verbose output.
    pub verbose: bool,

    /// Currency symbol shown next to balances.
    pub currency: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            currency: "$".into(),
        }
    }
}

impl UiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.verbose != default.verbose {
            self.verbose = other.verbose;
        }
        if other.currency != default.currency {
            self.currency = other.currency.clone();
        }
    }
}

/// Prompt configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    /// Retries allowed for an invalid interactive entry before the
    /// surrounding flow gives up.
    pub max_retries: u32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

impl PromptConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.max_retries != default.max_retries {
            self.max_retries = other.max_retries;
        }
    }
}
