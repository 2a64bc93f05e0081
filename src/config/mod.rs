// src/config/mod.rs

//! Profile files (`Shellcmd.toml`).
//!
//! A profile bundles a working directory and a flag set under a name so the
//! `shellcmd` binary (or a host program) can pick a policy by name.

pub mod loader;
pub mod model;
mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ProfileSection, RawConfigFile, ResolvedProfile};
