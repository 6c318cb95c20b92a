// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Dotfiles directory management.
//!
//! All source files that get linked into place live in one version controlled
//! directory called the __dotfiles directory__. The mappings file sits at its
//! top-level, and every source path in the mappings file is relative to it.
//!
//! # Locating The Dotfiles Directory
//!
//! The dotfiles directory is resolved once, up front, in the following order:
//!
//! 1. Explicit path given by the caller, e.g., through a command-line flag.
//! 2. Non-empty `$DOT_DIR` environment variable.
//! 3. Default path `$HOME/.dotfiles`.
//!
//! Everything past this point takes the resolved path as a plain parameter,
//! and never looks at the environment again.

use crate::{
    config::{self, ConfigError, MAPPINGS_FILE},
    path::{default_root_dir, NoWayHome},
    profile::ProfileTable,
};

use std::{
    env::var_os,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Environment variable that overrides the default dotfiles directory.
pub const DOT_DIR_ENV: &str = "DOT_DIR";

/// Resolve path to dotfiles directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`RootError::NoWayHome`] if falling back to default path, and the
///   home directory cannot be determined.
#[instrument(level = "debug")]
pub fn locate(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        debug!("use explicit dotfiles directory");
        return Ok(path);
    }

    if let Some(path) = var_os(DOT_DIR_ENV).filter(|path| !path.is_empty()) {
        debug!("use ${DOT_DIR_ENV} dotfiles directory");
        return Ok(PathBuf::from(path));
    }

    debug!("use default dotfiles directory");
    Ok(default_root_dir()?)
}

/// Resolved dotfiles directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfilesRoot {
    path: PathBuf,
}

impl DotfilesRoot {
    /// Construct new dotfiles directory handle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locate dotfiles directory.
    ///
    /// # Errors
    ///
    /// - Return [`RootError::NoWayHome`] if no path can be resolved.
    ///
    /// # See Also
    ///
    /// - [`locate`]
    pub fn locate(explicit: Option<PathBuf>) -> Result<Self> {
        locate(explicit).map(Self::new)
    }

    /// Treat dotfiles directory as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        self.path.as_path()
    }

    /// Absolute path to mappings file.
    pub fn mappings_path(&self) -> PathBuf {
        self.path.join(MAPPINGS_FILE)
    }

    /// Load every profile from mappings file.
    ///
    /// # Errors
    ///
    /// - Return [`RootError::Config`] if mappings file is missing, or invalid.
    pub fn load_profiles(&self) -> Result<ProfileTable> {
        Ok(config::load(&self.path)?)
    }
}

/// All possible error types for dotfiles directory interaction.
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    /// No dotfiles directory path could be resolved.
    #[error(transparent)]
    NoWayHome(#[from] NoWayHome),

    /// Mappings file is missing, or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Friendly result alias :3
type Result<T, E = RootError> = std::result::Result<T, E>;
