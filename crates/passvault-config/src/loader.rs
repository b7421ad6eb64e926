// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loading: compiled defaults, then TOML files, then environment.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PassvaultConfig;

/// Prefix for environment overrides, e.g. `PASSVAULT_STORAGE_DATABASE_PATH`.
pub const ENV_PREFIX: &str = "PASSVAULT_";

/// Sections reachable from the environment.
const SECTIONS: &[&str] = &["server", "storage", "encryption", "secrets", "users"];

pub const SYSTEM_CONFIG_PATH: &str = "/etc/passvault/passvault.toml";
pub const LOCAL_CONFIG_PATH: &str = "passvault.toml";

/// `$XDG_CONFIG_HOME/passvault/passvault.toml`, when a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("passvault").join("passvault.toml"))
}

/// Files consulted by [`load_config`], lowest precedence first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// Build the layered figment.
///
/// Later layers win: defaults, `/etc/passvault/passvault.toml`, the user
/// config file, `./passvault.toml`, then `PASSVAULT_*` variables.
pub fn build_figment() -> Figment {
    config_search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(PassvaultConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard search paths plus environment.
pub fn load_config() -> Result<PassvaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load from an explicit file, still honouring environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<PassvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PassvaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<PassvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PassvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Map `PASSVAULT_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `PASSVAULT_SECRETS_MAX_SECRET_LENGTH` is `secrets.max_secret_length`.
/// Variables outside the known sections (such as `PASSVAULT_PASSWORD`) are
/// not configuration and are skipped.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| section_key(key.as_str()).is_some())
        .map(|key| {
            section_key(key.as_str())
                .unwrap_or_else(|| key.as_str().to_ascii_lowercase())
                .into()
        })
}

fn section_key(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    SECTIONS.iter().find_map(|section| {
        lower
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|field| !field.is_empty())
            .map(|field| format!("{section}.{field}"))
    })
}
