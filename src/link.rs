// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Link reconciliation.
//!
//! Bring the filesystem in line with a [`FlatMapping`], or report how far off
//! it currently is. Every source path is joined onto the dotfiles directory,
//! and every target path gets its home marker expanded. The result is an
//! __entry__: one absolute source paired with one target.
//!
//! # Operations
//!
//! - [`Linker::link`] creates missing links, replaces links that point
//!   elsewhere, and moves real files out of the way into backups.
//! - [`Linker::check`] reports every entry that is not correctly linked.
//! - [`Linker::clean`] removes links at targets, but never real files.
//! - [`Linker::list`] shows the state of every entry.
//!
//! Entries are processed in source path order. A failure in one entry never
//! stops the remaining entries from being processed. Instead the failure is
//! recorded as an event in the returned [`Report`].
//!
//! # See Also
//!
//! - [`state::classify`]
//! - [`backup::backup`]

pub mod backup;
pub mod report;
pub mod state;

use crate::{
    link::{
        backup::{backup, backup_path, BackupError},
        report::{CheckEvent, CleanEvent, Issue, LinkEvent, ListEvent, Report},
        state::{classify, LinkState, StateError},
    },
    path,
    profile::FlatMapping,
};

use std::{
    fs::remove_file,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Reconcile symbolic links of a flattened mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linker {
    root: PathBuf,
    home: Option<PathBuf>,
}

impl Linker {
    /// Construct new linker for dotfiles directory and home directory.
    ///
    /// Targets are not expanded when `home` is [`None`].
    pub fn new(root: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            home,
        }
    }

    /// Construct new linker that expands targets against user's home.
    pub fn with_user_home(root: impl Into<PathBuf>) -> Self {
        Self::new(root, path::home_dir().ok())
    }

    /// Absolute source path, and expanded target path of a mapping entry.
    pub fn entry(&self, source: &str, target: &str) -> (PathBuf, PathBuf) {
        (
            self.root.join(source),
            path::resolve(target, self.home.as_deref()),
        )
    }

    fn entries<'a>(
        &'a self,
        mapping: &'a FlatMapping,
    ) -> impl Iterator<Item = (PathBuf, PathBuf)> + 'a {
        mapping
            .iter()
            .map(move |(source, target)| self.entry(source, target))
    }

    /// Create every link of a mapping.
    ///
    /// For each entry:
    ///
    /// 1. Skip entry with warning if source does not exist.
    /// 2. Skip entry if target already links to source.
    /// 3. Remove link at target if it points elsewhere.
    /// 4. Back up file or directory at target if it is not a link.
    /// 5. Create parent directories of target, and link target to source.
    ///
    /// Dry runs only report what would happen, and leave the filesystem
    /// untouched.
    #[instrument(skip(self, mapping), level = "debug")]
    pub fn link(&self, mapping: &FlatMapping, dry_run: bool) -> Report<LinkEvent> {
        info!("link {} entries", mapping.len());
        let mut report = Report::new();
        for (source, target) in self.entries(mapping) {
            debug!("link {:?} to {:?}", target.display(), source.display());
            if let Err(error) = link_entry(&mut report, source, target, dry_run) {
                warn!("{error}");
                report.push(LinkEvent::Failed(error));
            }
        }

        report
    }

    /// Check that every link of a mapping is in place.
    ///
    /// Reports every problem found, or that all links are correct. Source
    /// existence is not verified.
    #[instrument(skip(self, mapping), level = "debug")]
    pub fn check(&self, mapping: &FlatMapping) -> Report<CheckEvent> {
        let mut report = Report::new();
        for (source, target) in self.entries(mapping) {
            debug!("check {:?}", target.display());
            let issue = match classify(&target, &source) {
                Ok(LinkState::Correct) => continue,
                Ok(LinkState::Absent) => Issue::Missing { target },
                Ok(LinkState::WrongType) => Issue::NotSymlink { target },
                Ok(LinkState::Incorrect { actual }) => Issue::Incorrect {
                    target,
                    actual,
                    expected: source,
                },
                Err(error) => Issue::Unreadable(error),
            };
            report.push(CheckEvent::Issue(issue));
        }

        if report.problem_count() == 0 {
            report.push(CheckEvent::AllCorrect);
        }

        report
    }

    /// Remove every link of a mapping.
    ///
    /// Any link at a target is removed regardless of where it points. Real
    /// files and directories are never touched.
    #[instrument(skip(self, mapping), level = "debug")]
    pub fn clean(&self, mapping: &FlatMapping) -> Report<CleanEvent> {
        info!("clean {} entries", mapping.len());
        let mut report = Report::new();
        for (source, target) in self.entries(mapping) {
            debug!("clean {:?}", target.display());
            let event = match classify(&target, &source) {
                Ok(LinkState::Absent) => CleanEvent::NotFound { target },
                Ok(LinkState::WrongType) => CleanEvent::NotSymlink { target },
                Ok(LinkState::Correct | LinkState::Incorrect { .. }) => {
                    match remove_link(&target) {
                        Ok(()) => CleanEvent::Removed { target },
                        Err(error) => CleanEvent::Failed(error),
                    }
                }
                Err(error) => CleanEvent::Failed(error.into()),
            };
            report.push(event);
        }

        report
    }

    /// Show link state of every entry of a mapping.
    ///
    /// Never fails. Unreadable links show up as rows of their own.
    #[instrument(skip(self, profiles, mapping), level = "debug")]
    pub fn list(
        &self,
        profiles: impl IntoIterator<Item = impl Into<String>>,
        mapping: &FlatMapping,
    ) -> Report<ListEvent> {
        let mut report = Report::new();
        report.push(ListEvent::Heading {
            profiles: profiles.into_iter().map(Into::into).collect(),
        });
        report.push(ListEvent::Blank);

        if mapping.is_empty() {
            report.push(ListEvent::Empty);
            return report;
        }

        for (source, target) in self.entries(mapping) {
            let row = match classify(&target, &source) {
                Ok(LinkState::Correct) if source_exists(&source) => {
                    ListEvent::Linked { target, source }
                }
                Ok(LinkState::Correct) => ListEvent::SourceMissing { target, source },
                Ok(LinkState::Incorrect { actual }) => ListEvent::Incorrect {
                    target,
                    actual,
                    expected: source,
                },
                Ok(LinkState::WrongType) => ListEvent::NotSymlink { target },
                Ok(LinkState::Absent) => ListEvent::NotLinked { target },
                Err(error) => ListEvent::Unreadable { target, error },
            };
            report.push(row);
        }

        report
    }
}

fn link_entry(
    report: &mut Report<LinkEvent>,
    source: PathBuf,
    target: PathBuf,
    dry_run: bool,
) -> Result<()> {
    let exists = source.try_exists().map_err(|err| EntryError::SourceStat {
        source: err,
        path: source.clone(),
    })?;
    if !exists {
        report.push(LinkEvent::SourceMissing { source });
        return Ok(());
    }

    match classify(&target, &source)? {
        LinkState::Correct => {
            report.push(LinkEvent::AlreadyCorrect { target, source });
            return Ok(());
        }
        LinkState::Incorrect { actual } => {
            if !dry_run {
                remove_link(&target)?;
            }
            report.push(LinkEvent::Overriding {
                target: target.clone(),
                previous: actual,
                dry_run,
            });
        }
        LinkState::WrongType => {
            let backup = if dry_run {
                backup_path(&target)
            } else {
                backup(&target)?
            };
            report.push(LinkEvent::BackedUp {
                target: target.clone(),
                backup,
                dry_run,
            });
        }
        LinkState::Absent => {}
    }

    if dry_run {
        report.push(LinkEvent::WouldCreate { target, source });
        return Ok(());
    }

    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        mkdirp::mkdirp(parent).map_err(|err| EntryError::CreateParent {
            source: err,
            path: parent.into(),
        })?;
    }

    create_symlink(&source, &target).map_err(|err| EntryError::CreateLink {
        source: err,
        target: target.clone(),
        link_source: source.clone(),
    })?;
    report.push(LinkEvent::Created { target, source });

    Ok(())
}

// A source that cannot be inspected is shown as missing.
fn source_exists(source: &Path) -> bool {
    source.try_exists().unwrap_or(false)
}

fn remove_link(target: &Path) -> Result<()> {
    remove_symlink(target).map_err(|err| EntryError::RemoveLink {
        source: err,
        path: target.into(),
    })
}

#[cfg(unix)]
fn create_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(windows)]
fn create_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, target)
    } else {
        std::os::windows::fs::symlink_file(source, target)
    }
}

#[cfg(unix)]
fn remove_symlink(target: &Path) -> std::io::Result<()> {
    remove_file(target)
}

// Directory links must be removed as directories on Windows.
#[cfg(windows)]
fn remove_symlink(target: &Path) -> std::io::Result<()> {
    remove_file(target).or_else(|_| std::fs::remove_dir(target))
}

/// Failure of a single mapping entry.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// Target cannot be classified.
    #[error(transparent)]
    State(#[from] StateError),

    /// Source existence cannot be determined.
    #[error("error checking source {:?}", path.display())]
    SourceStat {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Existing link at target cannot be removed.
    #[error("error removing link {:?}", path.display())]
    RemoveLink {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File or directory at target cannot be backed up.
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Parent directories of target cannot be created.
    #[error("error creating directory {:?}", path.display())]
    CreateParent {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Link cannot be created.
    #[error("error creating link {:?} -> {:?}", target.display(), link_source.display())]
    CreateLink {
        #[source]
        source: std::io::Error,
        target: PathBuf,
        link_source: PathBuf,
    },
}

/// Check operation found entries that are not correctly linked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("found {count} issue(s)")]
pub struct IssuesFound {
    pub count: usize,
}

impl Report<CheckEvent> {
    /// Turn check report into pass or fail verdict.
    ///
    /// # Errors
    ///
    /// - Return [`IssuesFound`] if any entry is not correctly linked.
    pub fn verdict(&self) -> std::result::Result<(), IssuesFound> {
        match self.problem_count() {
            0 => Ok(()),
            count => Err(IssuesFound { count }),
        }
    }
}

/// Friendly result alias :3
type Result<T, E = EntryError> = std::result::Result<T, E>;
