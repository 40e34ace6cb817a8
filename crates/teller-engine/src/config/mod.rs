//! Layered TOML/env configuration.

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{PathsConfig, PromptConfig, TellerConfig, UiConfig};

use std::path::PathBuf;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "teller.toml";

/// Default global config path (`~/.teller/config.toml`).
///
/// Falls back to the relative path when no home directory can be
/// resolved.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".teller")
        .join("config.toml")
}
