// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT


use dotlink::{link::Linker, root::DotfilesRoot};

use anyhow::Result;
use std::{
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

/// Dotfiles directory and fake home directory laid out beneath a base path.
pub(crate) struct DotfilesFixture {
    root: PathBuf,
    home: PathBuf,
}

impl DotfilesFixture {
    pub(crate) fn new(base: impl AsRef<Path>, mappings: impl AsRef<str>) -> Result<Self> {
        let root = base.as_ref().join("dotfiles");
        let home = base.as_ref().join("home");
        create_dir_all(&root)?;
        create_dir_all(&home)?;
        write(root.join(".mappings"), mappings.as_ref())?;

        Ok(Self { root, home })
    }

    pub(crate) fn with_source(
        self,
        path: impl AsRef<Path>,
        contents: impl AsRef<str>,
    ) -> Result<Self> {
        let path = self.root.join(path);
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        write(path, contents.as_ref())?;

        Ok(self)
    }

    pub(crate) fn root(&self) -> DotfilesRoot {
        DotfilesRoot::new(&self.root)
    }

    pub(crate) fn linker(&self) -> Linker {
        Linker::new(&self.root, Some(self.home.clone()))
    }

    pub(crate) fn source(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub(crate) fn target(&self, path: impl AsRef<Path>) -> PathBuf {
        self.home.join(path)
    }
}

/// Render each event of a report as a string.
pub(crate) fn lines<E: std::fmt::Display>(events: &[E]) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}
