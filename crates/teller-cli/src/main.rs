//! Teller CLI - console for the client and user record files.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TELLER_*`)
//! 3. Project config (`teller.toml` in current directory)
//! 4. Global config (`~/.teller/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `TELLER_DEBUG`: Enable debug mode (`true`/`false`)
//! - `TELLER_VERBOSE`: Enable verbose output
//! - `TELLER_DATA_DIR`: Directory holding the record files
//! - `TELLER_CURRENCY`: Currency symbol shown next to balances

mod menu;
mod prompt;
mod ui;

use anyhow::Result;
use clap::Parser;
use prompt::{Prompt, PromptError};
use std::path::PathBuf;
use teller_engine::{ensure_bootstrap_admin, ClientOps, ConfigLoader, FileStore, TellerConfig, UserOps};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{Flow, Screens, UiError};

/// Teller CLI - console for the client and user record files
#[derive(Parser, Debug)]
#[command(name = "teller")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the record files (also: TELLER_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Custom global config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Skip login and run single-user with full access
    #[arg(long)]
    no_login: bool,
}

/// Merges file/env config and applies CLI argument overrides as the
/// highest-priority layer.
fn resolve_config(args: &Args) -> Result<TellerConfig, teller_engine::ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_global_config(path);
    }
    if let Some(ref root) = args.project {
        loader = loader.with_project_root(root);
    }

    let mut config = loader.load()?;

    if args.debug {
        config.debug = true;
    }
    if args.verbose {
        config.ui.verbose = true;
    }
    if let Some(ref dir) = args.data_dir {
        config.paths.data_dir = dir.clone();
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args).map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Filter priority: --debug > --verbose > RUST_LOG env > default "warn"
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else if config.ui.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    println!("Teller CLI v{}", env!("CARGO_PKG_VERSION"));

    info!(
        data_dir = %config.paths.data_dir.display(),
        "Record files directory"
    );

    let clients = ClientOps::new(FileStore::new(config.paths.clients_path()));
    let users = UserOps::new(FileStore::new(config.paths.users_path()));

    // A fresh installation has nobody to log in as.
    if ensure_bootstrap_admin(users.store())? {
        println!("First run: seeded the 'admin' user.");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let prompt = Prompt::new(stdin.lock(), stdout.lock(), config.prompt.max_retries);
    let mut screens = Screens::new(prompt, clients, users, config.ui.currency.clone());

    // --no-login: the pre-user single-operator mode. Logout means exit,
    // there is nobody else to log in as.
    if args.no_login {
        let session = teller_engine::Session::new("operator", teller_engine::Permissions::FULL_ACCESS);
        info!(session = %session, "single-user session opened");
        screens.run(&session)?;
        return Ok(());
    }

    // Login → main loop → logout starts over; exit or EOF leaves.
    loop {
        let session = match screens.login() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(()),
            Err(UiError::Prompt(PromptError::Eof)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        info!(session = %session, "session opened");
        match screens.run(&session)? {
            Flow::Logout => {
                info!(user = session.username(), "logged out");
                continue;
            }
            Flow::Exit => {
                info!(user = session.username(), "exiting");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            debug: false,
            verbose: false,
            data_dir: None,
            config: Some(PathBuf::from("/nonexistent/config.toml")),
            project: Some(PathBuf::from("/nonexistent/project")),
            no_login: false,
        }
    }

    #[test]
    fn resolve_defaults_no_overrides() {
        let config = resolve_config(&args()).expect("resolve");
        assert!(!config.debug);
        assert!(!config.ui.verbose);
        assert_eq!(config.paths.data_dir, PathBuf::from("."));
    }

    #[test]
    fn resolve_debug_and_verbose_overrides() {
        let mut a = args();
        a.debug = true;
        a.verbose = true;

        let config = resolve_config(&a).expect("resolve");
        assert!(config.debug);
        assert!(config.ui.verbose);
    }

    #[test]
    fn resolve_data_dir_override() {
        let mut a = args();
        a.data_dir = Some(PathBuf::from("/var/teller"));

        let config = resolve_config(&a).expect("resolve");
        assert_eq!(config.paths.data_dir, PathBuf::from("/var/teller"));
        assert_eq!(
            config.paths.clients_path(),
            PathBuf::from("/var/teller/CLIENTS.txt")
        );
    }

    #[test]
    fn false_flags_preserve_loader_values() {
        // No accidental forced write of `debug = false` over file config.
        let config = resolve_config(&args()).expect("resolve");
        let baseline = TellerConfig::default();
        assert_eq!(config.debug, baseline.debug);
        assert_eq!(config.ui.verbose, baseline.ui.verbose);
    }
}
