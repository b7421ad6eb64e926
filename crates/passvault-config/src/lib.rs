// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Passvault.
//!
//! TOML files in the usual locations, overridden by `PASSVAULT_*`
//! environment variables, strictly validated, with miette diagnostics.
//!
//! ```no_run
//! use passvault_config::load_and_validate;
//!
//! let config = match load_and_validate() {
//!     Ok(config) => config,
//!     Err(errors) => {
//!         passvault_config::render_errors(&errors);
//!         std::process::exit(2);
//!     }
//! };
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PassvaultConfig;

/// Load from the standard locations and the environment, then validate.
pub fn load_and_validate() -> Result<PassvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config(), || {
        read_sources(&loader::config_search_paths())
    })
}

/// Load from one file plus the environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<PassvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources(&[path.to_path_buf()])
    })
}

/// Load from a TOML string, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<PassvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<PassvaultConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PassvaultConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(database = %config.storage.database_path, "configuration loaded");
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read whichever config files exist, for span rendering.
fn read_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let name = std::path::absolute(path).unwrap_or_else(|_| path.clone());
            Some((name.display().to_string(), content))
        })
        .collect()
}
