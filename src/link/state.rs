// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Link state classification.
//!
//! Inspect whatever currently sits at a link target, and figure out how it
//! relates to the source that target is supposed to link to. Nothing here
//! mutates the filesystem.

use std::{
    fs::{read_link, symlink_metadata},
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// State of a link target relative to its expected source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at target.
    Absent,

    /// Target exists, but is not a symbolic link.
    WrongType,

    /// Target is a symbolic link to expected source.
    Correct,

    /// Target is a symbolic link to something else.
    Incorrect {
        /// Raw link target currently stored at target.
        actual: PathBuf,
    },
}

/// Classify link target against expected source path.
///
/// Never follows symbolic links, so a link to a directory is still treated as
/// a link. Stored link targets are compared to `expected` byte for byte. No
/// normalization is performed, thus "/a/b/" and "/a/./b" never match "/a/b".
///
/// # Errors
///
/// - Return [`StateError::Stat`] if target cannot be inspected for any reason
///   other than it not existing.
/// - Return [`StateError::ReadLink`] if target is a symbolic link that cannot
///   be read.
pub fn classify(target: impl AsRef<Path>, expected: impl AsRef<Path>) -> Result<LinkState> {
    let target = target.as_ref();
    let metadata = match symlink_metadata(target) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LinkState::Absent),
        Err(err) => {
            return Err(StateError::Stat {
                source: err,
                path: target.into(),
            })
        }
    };

    if !metadata.file_type().is_symlink() {
        return Ok(LinkState::WrongType);
    }

    let actual = read_link(target).map_err(|err| StateError::ReadLink {
        source: err,
        path: target.into(),
    })?;

    if actual.as_os_str() == expected.as_ref().as_os_str() {
        Ok(LinkState::Correct)
    } else {
        Ok(LinkState::Incorrect { actual })
    }
}

/// Link state classification error types.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Target cannot be inspected.
    #[error("error checking {:?}", path.display())]
    Stat {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Target is a symbolic link that cannot be read.
    #[error("error reading link {:?}", path.display())]
    ReadLink {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = StateError> = std::result::Result<T, E>;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{
        env::current_dir,
        fs::{create_dir, write},
        os::unix::fs::symlink,
    };

    #[sealed_test]
    fn classify_absent() -> anyhow::Result<()> {
        let dir = current_dir()?;
        let result = classify(dir.join("missing"), dir.join("source"))?;
        assert_eq!(result, LinkState::Absent);

        Ok(())
    }

    #[sealed_test]
    fn classify_regular_file_and_directory() -> anyhow::Result<()> {
        let dir = current_dir()?;
        write(dir.join("file"), "blah")?;
        create_dir(dir.join("dir"))?;

        assert_eq!(classify(dir.join("file"), dir.join("source"))?, LinkState::WrongType);
        assert_eq!(classify(dir.join("dir"), dir.join("source"))?, LinkState::WrongType);

        Ok(())
    }

    #[sealed_test]
    fn classify_correct_link_even_when_dangling() -> anyhow::Result<()> {
        let dir = current_dir()?;
        let source = dir.join("source");
        symlink(&source, dir.join("target"))?;

        assert_eq!(classify(dir.join("target"), &source)?, LinkState::Correct);

        Ok(())
    }

    #[sealed_test]
    fn classify_link_to_directory_is_not_followed() -> anyhow::Result<()> {
        let dir = current_dir()?;
        let source = dir.join("source");
        create_dir(&source)?;
        symlink(&source, dir.join("target"))?;

        assert_eq!(classify(dir.join("target"), &source)?, LinkState::Correct);

        Ok(())
    }

    #[sealed_test]
    fn classify_incorrect_link() -> anyhow::Result<()> {
        let dir = current_dir()?;
        let other = dir.join("other");
        symlink(&other, dir.join("target"))?;

        let result = classify(dir.join("target"), dir.join("source"))?;
        assert_eq!(result, LinkState::Incorrect { actual: other });

        Ok(())
    }

    #[sealed_test]
    fn classify_compares_raw_link_text() -> anyhow::Result<()> {
        let dir = current_dir()?;
        let source = dir.join("source");
        create_dir(&source)?;
        create_dir(dir.join("sub"))?;

        let trailing = PathBuf::from(format!("{}/", source.display()));
        symlink(&trailing, dir.join("trailing"))?;
        let dotted = dir.join("sub").join("..").join("source");
        symlink(&dotted, dir.join("dotted"))?;
        symlink("source", dir.join("relative"))?;

        assert_eq!(
            classify(dir.join("trailing"), &source)?,
            LinkState::Incorrect { actual: trailing }
        );
        assert_eq!(
            classify(dir.join("dotted"), &source)?,
            LinkState::Incorrect { actual: dotted }
        );
        assert_eq!(
            classify(dir.join("relative"), &source)?,
            LinkState::Incorrect {
                actual: PathBuf::from("source")
            }
        );

        Ok(())
    }

    #[sealed_test]
    fn classify_stat_failure_is_an_error() -> anyhow::Result<()> {
        let dir = current_dir()?;
        write(dir.join("file"), "blah")?;

        // A regular file cannot have children.
        let result = classify(dir.join("file").join("child"), dir.join("source"));
        assert!(matches!(result, Err(StateError::Stat { .. })));

        Ok(())
    }
}
