// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, ShellError};
use crate::flags::Flag;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ShellError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let config = ConfigFile::new_unchecked(raw.defaults, raw.profile);
        validate_profile_names(&config)?;
        validate_stream_flags(&config)?;
        Ok(config)
    }
}

fn validate_profile_names(cfg: &ConfigFile) -> Result<()> {
    for name in cfg.profile_names() {
        if name.trim().is_empty() {
            return Err(ShellError::Config(
                "profile names must not be empty".to_string(),
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ShellError::Config(format!(
                "profile name '{name}' must not contain whitespace"
            )));
        }
    }
    Ok(())
}

/// `std-err-in-result` has no effect when stderr is passed through; a
/// profile asking for both is almost certainly a mistake.
fn validate_stream_flags(cfg: &ConfigFile) -> Result<()> {
    for (name, section) in cfg.sections() {
        let inherit = name != "defaults" && section.inherit_defaults;
        let flags = cfg.resolve_section(section, inherit).flags.expanded();

        if flags.contains(Flag::StdErrInResult) && flags.contains(Flag::PassThroughStdErr) {
            return Err(ShellError::Config(format!(
                "profile '{name}' combines `{}` with `{}`; stderr would be passed through and never merged",
                Flag::StdErrInResult,
                Flag::PassThroughStdErr
            )));
        }
    }
    Ok(())
}
