//! Layered configuration loading
//!
//! Files are merged lowest priority first, then an explicit `--config` file,
//! then `CMDWRAP_*` environment variables:
//! `/etc/cmdwrap/config.toml`, `$XDG_CONFIG_HOME/cmdwrap/config.toml`,
//! `~/.cmdwrap.toml`, `./.cmdwrap.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::model::Config;

const APP_NAME: &str = "cmdwrap";

/// Prefix for environment overrides, nested with `__`
const ENV_PREFIX: &str = "CMDWRAP_";

/// Candidate config locations, lowest priority first
fn search_paths() -> Vec<PathBuf> {
    let file_name = format!(".{}.toml", APP_NAME);

    [
        Some(Path::new("/etc").join(APP_NAME).join("config.toml")),
        dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml")),
        dirs::home_dir().map(|h| h.join(&file_name)),
        Some(PathBuf::from(&file_name)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Config files that exist and will be merged, lowest priority first
pub fn find_config_files() -> Vec<PathBuf> {
    search_paths().into_iter().filter(|p| p.is_file()).collect()
}

fn layered(override_path: Option<&Path>) -> Figment {
    let files = find_config_files();
    let base = Figment::from(Serialized::defaults(Config::default()));

    let mut figment = files.iter().fold(base, |figment, path| {
        tracing::debug!("Merging config file {}", path.display());
        figment.merge(Toml::file(path))
    });

    match override_path {
        Some(path) if path.is_file() => {
            tracing::debug!("Merging config override {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        Some(path) => tracing::warn!("Config file {} does not exist, ignoring", path.display()),
        None => {}
    }

    // CMDWRAP_DEFAULTS__WORKING_DIR=/srv -> defaults.working_dir
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Resolve the effective configuration.
///
/// `override_path` is merged above every discovered file but below the
/// environment. A missing override is logged and skipped.
pub fn load_config(override_path: Option<&str>) -> Result<Config> {
    layered(override_path.map(Path::new))
        .extract()
        .context("Failed to load configuration")
}
