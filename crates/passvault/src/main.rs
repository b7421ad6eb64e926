// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passvault - a password vault with per-secret visibility.
//!
//! This is the binary entry point.

mod commands;
mod prompt;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use passvault_config::{ConfigError, PassvaultConfig};
use passvault_core::{PassvaultError, SecretId, Visibility};
use secrecy::SecretString;
use tracing::{error, warn};

use crate::commands::Vault;

/// Passvault - a password vault with per-secret visibility.
#[derive(Parser, Debug)]
#[command(name = "passvault", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the default search paths.
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Act as this user. The password comes from PASSVAULT_PASSWORD or a prompt.
    #[arg(long, short = 'u', global = true, env = "PASSVAULT_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a newly generated encryption key.
    Keygen,
    /// Validate configuration, the encryption key and the database.
    Check,
    /// Register a new user account.
    Register {
        username: String,
    },
    /// Store a secret read from stdin and print its id.
    Create {
        /// private, shared or public.
        #[arg(long, default_value = "private")]
        visibility: Visibility,
        /// Share with this user (repeatable, shared visibility only).
        #[arg(long = "share", value_name = "USERNAME")]
        share: Vec<String>,
    },
    /// Print a secret's plaintext.
    Get {
        id: SecretId,
    },
    /// Change a secret's visibility or share list. Owner only.
    Update {
        id: SecretId,
        #[arg(long)]
        visibility: Visibility,
        /// New share list member (repeatable).
        #[arg(long = "share", value_name = "USERNAME")]
        share: Vec<String>,
        /// Replace the share list with an empty one.
        #[arg(long, conflicts_with = "share")]
        clear_shares: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Key generation must work before any config exists.
    if matches!(cli.command, Commands::Keygen) {
        return finish(commands::keygen());
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            passvault_config::render_errors(&errors);
            return ExitCode::from(commands::exit::CONFIG);
        }
    };

    init_tracing(&config.server.log_level);
    finish(run(cli, config).await)
}

fn load_config(path: Option<&Path>) -> Result<PassvaultConfig, Vec<ConfigError>> {
    match path {
        Some(path) => passvault_config::load_and_validate_path(path),
        None => passvault_config::load_and_validate(),
    }
}

fn finish(result: Result<(), PassvaultError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_client_error() {
                error!(error = %e, "command failed");
            }
            eprintln!("error: {e}");
            ExitCode::from(commands::exit_code(&e))
        }
    }
}

/// Initialize the tracing subscriber. Output goes to stderr so stdout
/// carries only command results.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("passvault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn login_password(user: Option<&str>) -> Result<Option<SecretString>, PassvaultError> {
    user.map(prompt::password).transpose()
}

async fn close<T>(vault: Vault, result: Result<T, PassvaultError>) -> Result<(), PassvaultError> {
    if let Err(e) = vault.close().await {
        if result.is_err() {
            warn!(error = %e, "failed to close storage");
        } else {
            return Err(e);
        }
    }
    result.map(|_| ())
}

async fn run(cli: Cli, config: PassvaultConfig) -> Result<(), PassvaultError> {
    let user = cli.user.as_deref();

    match cli.command {
        Commands::Keygen => commands::keygen(),
        Commands::Check => commands::check(&config).await,
        Commands::Register { username } => {
            let password = prompt::new_password(&username)?;
            let vault = Vault::open(&config, false).await?;
            let result = commands::register(&vault, &username, &password).await;
            close(vault, result).await
        }
        Commands::Create { visibility, share } => {
            let password = login_password(user)?;
            let plaintext = prompt::secret_value()?;
            let vault = Vault::open(&config, true).await?;
            let result = async {
                let actor = vault.login(user, password.as_ref()).await?;
                commands::create(&vault, actor.as_deref(), visibility, share, plaintext).await
            }
            .await;
            close(vault, result).await
        }
        Commands::Get { id } => {
            let password = login_password(user)?;
            let vault = Vault::open(&config, true).await?;
            let result = async {
                let actor = vault.login(user, password.as_ref()).await?;
                commands::get(&vault, actor.as_deref(), &id).await
            }
            .await;
            close(vault, result).await
        }
        Commands::Update {
            id,
            visibility,
            share,
            clear_shares,
        } => {
            let change = commands::visibility_change(visibility, share, clear_shares);
            let password = login_password(user)?;
            let vault = Vault::open(&config, true).await?;
            let result = async {
                let actor = vault.login(user, password.as_ref()).await?;
                commands::update(&vault, actor.as_deref(), &id, change).await
            }
            .await;
            close(vault, result).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_defaults_to_private() {
        let cli = Cli::try_parse_from(["passvault", "create"]).unwrap();
        match cli.command {
            Commands::Create { visibility, share } => {
                assert_eq!(visibility, Visibility::Private);
                assert!(share.is_empty());
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn create_parses_visibility_and_shares() {
        let cli = Cli::try_parse_from([
            "passvault", "--user", "alice", "create", "--visibility", "SHARED", "--share", "bob",
            "--share", "carol",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Commands::Create { visibility, share } => {
                assert_eq!(visibility, Visibility::Shared);
                assert_eq!(share, vec!["bob".to_string(), "carol".to_string()]);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn update_rejects_share_with_clear() {
        let id = SecretId::new().to_string();
        let result = Cli::try_parse_from([
            "passvault", "update", &id, "--visibility", "shared", "--share", "bob", "--clear-shares",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn get_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["passvault", "get", "not-a-uuid"]).is_err());
    }

    #[test]
    fn unknown_visibility_is_rejected() {
        assert!(Cli::try_parse_from(["passvault", "create", "--visibility", "friends"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["passvault", "check", "--config", "/tmp/pv.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/pv.toml")));
        assert!(matches!(cli.command, Commands::Check));
    }
}
