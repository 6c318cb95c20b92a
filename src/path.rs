// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for link targets and the dotfiles
//! directory itself.
//!
//! # Home Marker
//!
//! Link targets in the mappings file may start with `~`, which stands for the
//! user's home directory. Only a bare `~` or `~/` prefix is expanded. Forms
//! like `~alice/.vimrc` are left untouched.
//!
//! If the home directory cannot be determined, then targets are returned
//! unexpanded. This is a silent degrade rather than an error, so a target like
//! `~/.vimrc` ends up as a literal relative path with a tilde in it. Any
//! filesystem call on such a path will then fail with an error that names it.

use std::path::{Component, Path, PathBuf};

/// Name of default dotfiles directory placed in user's home directory.
pub const DEFAULT_ROOT_DIR_NAME: &str = ".dotfiles";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine default absolute path to dotfiles directory.
///
/// Uses `$HOME/.dotfiles` as the default absolute path. Does not check if the
/// path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_root_dir() -> Result<PathBuf> {
    home_dir().map(|path| path.join(DEFAULT_ROOT_DIR_NAME))
}

/// Expand leading home marker of a target path against given home directory.
///
/// An expanded path is the home directory joined with whatever followed the
/// marker, normalized lexically. Thus "~/.config//nvim/" becomes
/// "$HOME/.config/nvim", and "~/a/../b" becomes "$HOME/b".
///
/// Returns `path` unchanged when it does not start with the home marker, or
/// when `home` is [`None`] or not valid UTF-8.
pub fn resolve(path: impl AsRef<str>, home: Option<&Path>) -> PathBuf {
    let path = path.as_ref();
    let expanded = shellexpand::tilde_with_context(path, || home.and_then(Path::to_str));
    if expanded == path {
        return PathBuf::from(path);
    }

    normalize(&*expanded)
}

/// Lexically normalize path.
///
/// Drops repeated separators, trailing separators, and "." components. Each
/// ".." component removes the component before it, except at the root. Never
/// touches the filesystem, so symbolic links are not resolved.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normal.components().next_back() {
                Some(Component::Normal(_)) => {
                    normal.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normal.push(component),
            },
            _ => normal.push(component),
        }
    }

    if normal.as_os_str().is_empty() {
        normal.push(Component::CurDir);
    }

    normal
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;
