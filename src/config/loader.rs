// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config_root_dir;
use crate::errors::Result;

/// Load a profile file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization (flag names are checked here);
/// use [`load_and_validate`] for the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a profile file and validate it.
///
/// Relative `working_dir` entries are anchored at the file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?.with_root(config_root_dir(path));
    debug!(
        config = %path.display(),
        profiles = config.profile_names().count(),
        "loaded profile file"
    );
    Ok(config)
}

/// `Shellcmd.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Shellcmd.toml")
}
