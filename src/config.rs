// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the mappings file that lives at the top-level of the
//! dotfiles directory.
//!
//! # General Layout
//!
//! The mappings file is a TOML document named ".mappings". Each top-level
//! table is a profile, and each key-value pair of a profile maps a source path
//! relative to the dotfiles directory to the target path of its link:
//!
//! ```toml
//! [general]
//! "vim/.vimrc" = "~/.vimrc"
//! "git/general.gitconfig" = "~/.gitconfig"
//!
//! [work]
//! "git/work.gitconfig" = "~/.gitconfig"
//! ```
//!
//! The "general" profile is mandatory. Every other profile is optional.

use crate::profile::{ProfileTable, DEFAULT_PROFILE};

use std::{
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Name of mappings file at the top-level of the dotfiles directory.
pub const MAPPINGS_FILE: &str = ".mappings";

impl FromStr for ProfileTable {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let table: ProfileTable = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Default profile must always be defined.
        if !table.contains(DEFAULT_PROFILE) {
            return Err(ConfigError::MissingDefaultProfile);
        }

        // INVARIANT: Source and target paths are never empty.
        for (name, profile) in table.iter() {
            for (source, target) in profile.iter() {
                if source.trim().is_empty() {
                    return Err(ConfigError::EmptySource {
                        profile: name.into(),
                    });
                }

                if target.trim().is_empty() {
                    return Err(ConfigError::EmptyTarget {
                        profile: name.into(),
                        source_path: source.into(),
                    });
                }
            }
        }

        Ok(table)
    }
}

/// Read and parse mappings file of target dotfiles directory.
///
/// # Errors
///
/// - Return [`ConfigError::NotFound`] if mappings file does not exist.
/// - Return [`ConfigError::Read`] if mappings file cannot be read.
/// - Return any of the parsing errors of [`ProfileTable::from_str`].
#[instrument(skip(root), level = "debug")]
pub fn load(root: impl AsRef<Path>) -> Result<ProfileTable> {
    let path = root.as_ref().join(MAPPINGS_FILE);
    debug!("load mappings file {:?}", path.display());

    let data = read_to_string(&path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound { path: path.clone() },
        _ => ConfigError::Read {
            source: err,
            path: path.clone(),
        },
    })?;

    data.parse()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Mappings file does not exist.
    #[error(".mappings file not found at {:?}", path.display())]
    NotFound { path: PathBuf },

    /// Mappings file exists, but cannot be read.
    #[error("failed to read .mappings file at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize mappings file.
    #[error("failed to parse .mappings file")]
    Deserialize(#[source] toml::de::Error),

    /// Default profile is not defined.
    #[error("[general] profile is required but not found in .mappings")]
    MissingDefaultProfile,

    /// Profile maps an empty source path.
    #[error("profile [{profile}] contains an empty source path")]
    EmptySource { profile: String },

    /// Profile maps a source path to an empty target path.
    #[error("profile [{profile}] maps {source_path:?} to an empty target path")]
    EmptyTarget {
        profile: String,
        source_path: String,
    },
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
