// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{Result, ShellError};
use crate::flags::{Flag, Flags};

/// `Shellcmd.toml` exactly as deserialised.
///
/// ```toml
/// [defaults]
/// flags = ["strict"]
///
/// [profile.quiet]
/// flags = ["trim-space", "first-line"]
/// working_dir = "sub/dir"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub defaults: ProfileSection,

    #[serde(default)]
    pub profile: BTreeMap<String, ProfileSection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSection {
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    #[serde(default)]
    pub flags: Vec<Flag>,

    /// Union the `[defaults]` flags into this profile. Ignored on
    /// `[defaults]` itself.
    #[serde(default = "default_inherit")]
    pub inherit_defaults: bool,
}

fn default_inherit() -> bool {
    true
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            working_dir: None,
            flags: Vec::new(),
            inherit_defaults: default_inherit(),
        }
    }
}

/// A validated config file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    defaults: ProfileSection,
    profiles: BTreeMap<String, ProfileSection>,
    root: PathBuf,
}

/// Working directory and flags ready to build a [`Context`](crate::Context).
///
/// An empty `working_dir` means the current directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub working_dir: PathBuf,
    pub flags: Flags,
}

impl ConfigFile {
    /// Build without validation. Prefer `ConfigFile::try_from(raw)`.
    pub fn new_unchecked(
        defaults: ProfileSection,
        profiles: BTreeMap<String, ProfileSection>,
    ) -> Self {
        Self {
            defaults,
            profiles,
            root: PathBuf::new(),
        }
    }

    /// Resolve relative working directories against `root` (usually the
    /// directory holding the config file).
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Resolve `name`, or `[defaults]` alone when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedProfile> {
        let Some(name) = name else {
            return Ok(self.resolve_section(&self.defaults, false));
        };

        let section = self.profiles.get(name).ok_or_else(|| {
            ShellError::Config(format!(
                "unknown profile '{name}' (available: {})",
                self.profile_names().collect::<Vec<_>>().join(", ")
            ))
        })?;

        Ok(self.resolve_section(section, section.inherit_defaults))
    }

    pub(crate) fn resolve_section(
        &self,
        section: &ProfileSection,
        inherit: bool,
    ) -> ResolvedProfile {
        let mut flags: Flags = section.flags.iter().copied().collect();
        let mut working_dir = section.working_dir.clone();

        if inherit {
            flags.extend(self.defaults.flags.iter().copied());
            if working_dir.is_none() {
                working_dir = self.defaults.working_dir.clone();
            }
        }

        ResolvedProfile {
            working_dir: working_dir
                .map(|dir| self.anchor(&dir))
                .unwrap_or_default(),
            flags,
        }
    }

    pub(crate) fn sections(&self) -> impl Iterator<Item = (&str, &ProfileSection)> {
        std::iter::once(("defaults", &self.defaults))
            .chain(self.profiles.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn anchor(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() || self.root.as_os_str().is_empty() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }
}
