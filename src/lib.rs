// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile-aware dotfile linker.
//!
//! Keep every dotfile in one dotfiles directory, and describe where each one
//! should be linked through named profiles in a mappings file. Requested
//! profiles are flattened into one mapping, which then gets reconciled against
//! the filesystem by creating, checking, listing, or removing symbolic links.
//!
//! # See Also
//!
//! - [`config`]
//! - [`profile`]
//! - [`link`]

pub mod config;
pub mod link;
pub mod path;
pub mod profile;
pub mod root;
