// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Reconciliation reports.
//!
//! Every reconciliation operation describes what it did, or would do, per
//! entry through a list of events instead of printing directly. Each event
//! belongs to one of two channels: routine status, or problems (warnings and
//! errors). Callers decide where those channels go. The command-line front end
//! sends status to stdout, and problems to stderr.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    io::{Result as IoResult, Write},
    path::PathBuf,
};

/// Output channel of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Routine progress, or status information.
    Status,

    /// Warnings and errors.
    Problem,
}

/// Event that can be rendered into a report line.
pub trait Reportable: Display {
    /// Channel that event belongs to.
    fn channel(&self) -> Channel;
}

/// Ordered collection of events produced by one operation.
#[derive(Debug)]
pub struct Report<E> {
    events: Vec<E>,
}

impl<E> Default for Report<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> Report<E>
where
    E: Reportable,
{
    /// Construct new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// All events in the order they occurred.
    pub fn events(&self) -> &[E] {
        self.events.as_slice()
    }

    /// Iterate through events that belong to the problem channel.
    pub fn problems(&self) -> impl Iterator<Item = &E> {
        self.events
            .iter()
            .filter(|event| event.channel() == Channel::Problem)
    }

    /// Count events that belong to the problem channel.
    pub fn problem_count(&self) -> usize {
        self.problems().count()
    }

    /// Write each event as one line to the writer of its channel.
    ///
    /// # Errors
    ///
    /// - Return [`std::io::Error`] if either writer fails.
    pub fn render(&self, status: &mut impl Write, problem: &mut impl Write) -> IoResult<()> {
        for event in &self.events {
            match event.channel() {
                Channel::Status => writeln!(status, "{event}")?,
                Channel::Problem => writeln!(problem, "{event}")?,
            }
        }

        Ok(())
    }
}

/// Event produced by link operation.
#[derive(Debug)]
pub enum LinkEvent {
    /// Source does not exist, so entry was skipped.
    SourceMissing { source: PathBuf },

    /// Target already links to source.
    AlreadyCorrect { target: PathBuf, source: PathBuf },

    /// Existing link at target pointing elsewhere is replaced.
    Overriding {
        target: PathBuf,
        previous: PathBuf,
        dry_run: bool,
    },

    /// Existing file or directory at target is moved into backup.
    BackedUp {
        target: PathBuf,
        backup: PathBuf,
        dry_run: bool,
    },

    /// Link would be created, but dry run is active.
    WouldCreate { target: PathBuf, source: PathBuf },

    /// Link was created.
    Created { target: PathBuf, source: PathBuf },

    /// Entry failed, and was skipped.
    Failed(crate::link::EntryError),
}

impl Reportable for LinkEvent {
    fn channel(&self) -> Channel {
        match self {
            Self::SourceMissing { .. } | Self::Failed(_) => Channel::Problem,
            _ => Channel::Status,
        }
    }
}

impl Display for LinkEvent {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::SourceMissing { source } => write!(
                fmt,
                "Warning: Source file does not exist: {}",
                source.display()
            ),
            Self::AlreadyCorrect { target, source } => write!(
                fmt,
                "Skipped (already correct): {} -> {}",
                target.display(),
                source.display()
            ),
            Self::Overriding {
                target,
                previous,
                dry_run,
            } => write!(
                fmt,
                "{}: {} (was pointing to {})",
                if *dry_run { "Would override" } else { "Overriding" },
                target.display(),
                previous.display()
            ),
            Self::BackedUp {
                target,
                backup,
                dry_run,
            } => write!(
                fmt,
                "{}: {} -> {}",
                if *dry_run { "Would back up" } else { "Backed up" },
                target.display(),
                backup.display()
            ),
            Self::WouldCreate { target, source } => write!(
                fmt,
                "Would create: {} -> {}",
                target.display(),
                source.display()
            ),
            Self::Created { target, source } => {
                write!(fmt, "Created: {} -> {}", target.display(), source.display())
            }
            Self::Failed(error) => write_chain(fmt, error),
        }
    }
}

/// Problem found by check operation.
#[derive(Debug)]
pub enum Issue {
    /// Nothing exists at target.
    Missing { target: PathBuf },

    /// Target exists, but is not a symbolic link.
    NotSymlink { target: PathBuf },

    /// Target links to something other than expected source.
    Incorrect {
        target: PathBuf,
        actual: PathBuf,
        expected: PathBuf,
    },

    /// Target cannot be inspected.
    Unreadable(crate::link::state::StateError),
}

impl Display for Issue {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Missing { target } => write!(fmt, "Missing link: {}", target.display()),
            Self::NotSymlink { target } => write!(fmt, "Not a symlink: {}", target.display()),
            Self::Incorrect {
                target,
                actual,
                expected,
            } => write!(
                fmt,
                "Incorrect link: {} -> {} (expected: {})",
                target.display(),
                actual.display(),
                expected.display()
            ),
            Self::Unreadable(error) => write_chain(fmt, error),
        }
    }
}

/// Event produced by check operation.
#[derive(Debug)]
pub enum CheckEvent {
    /// Every entry is correctly linked.
    AllCorrect,

    /// Entry is not correctly linked.
    Issue(Issue),
}

impl Reportable for CheckEvent {
    fn channel(&self) -> Channel {
        match self {
            Self::AllCorrect => Channel::Status,
            Self::Issue(_) => Channel::Problem,
        }
    }
}

impl Display for CheckEvent {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::AllCorrect => fmt.write_str("All links are correct"),
            Self::Issue(issue) => issue.fmt(fmt),
        }
    }
}

/// Event produced by clean operation.
#[derive(Debug)]
pub enum CleanEvent {
    /// Nothing exists at target.
    NotFound { target: PathBuf },

    /// Target is a real file or directory, so it was left alone.
    NotSymlink { target: PathBuf },

    /// Link at target was removed.
    Removed { target: PathBuf },

    /// Entry failed, and was skipped.
    Failed(crate::link::EntryError),
}

impl Reportable for CleanEvent {
    fn channel(&self) -> Channel {
        match self {
            Self::Failed(_) => Channel::Problem,
            _ => Channel::Status,
        }
    }
}

impl Display for CleanEvent {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NotFound { target } => {
                write!(fmt, "Skipped (not found): {}", target.display())
            }
            Self::NotSymlink { target } => {
                write!(fmt, "Skipped (not a symlink): {}", target.display())
            }
            Self::Removed { target } => write!(fmt, "Removed: {}", target.display()),
            Self::Failed(error) => write_chain(fmt, error),
        }
    }
}

/// Row produced by list operation.
///
/// Listing is purely diagnostic, so every row is routine status.
#[derive(Debug)]
pub enum ListEvent {
    /// Heading naming the listed profiles.
    Heading { profiles: Vec<String> },

    /// Empty separator line.
    Blank,

    /// Target links to source, and source exists.
    Linked { target: PathBuf, source: PathBuf },

    /// Target links to source, but source no longer exists.
    SourceMissing { target: PathBuf, source: PathBuf },

    /// Target links to something other than expected source.
    Incorrect {
        target: PathBuf,
        actual: PathBuf,
        expected: PathBuf,
    },

    /// Target cannot be inspected.
    Unreadable {
        target: PathBuf,
        error: crate::link::state::StateError,
    },

    /// Target exists, but is not a symbolic link.
    NotSymlink { target: PathBuf },

    /// Nothing exists at target.
    NotLinked { target: PathBuf },

    /// Requested profiles map nothing.
    Empty,
}

impl Reportable for ListEvent {
    fn channel(&self) -> Channel {
        Channel::Status
    }
}

impl Display for ListEvent {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Heading { profiles } => write!(
                fmt,
                "Dotfiles links for profile(s): {}",
                profiles.join(", ")
            ),
            Self::Linked { target, source } => {
                write!(fmt, "✅ {} -> {}", target.display(), source.display())
            }
            Self::SourceMissing { target, source } => write!(
                fmt,
                "⚠️  {} -> {} (source missing)",
                target.display(),
                source.display()
            ),
            Self::Incorrect {
                target,
                actual,
                expected,
            } => write!(
                fmt,
                "❌ {} -> {} (expected: {})",
                target.display(),
                actual.display(),
                expected.display()
            ),
            Self::Unreadable { target, error } => {
                write!(fmt, "❌ {} -> ??? (", target.display())?;
                write_chain(fmt, error)?;
                fmt.write_str(")")
            }
            Self::NotSymlink { target } => {
                write!(fmt, "❌ {} (exists but not a symlink)", target.display())
            }
            Self::NotLinked { target } => write!(fmt, "❌ {} (not linked)", target.display()),
            Self::Blank => Ok(()),
            Self::Empty => fmt.write_str("No dotfile mappings found in the specified profile(s)."),
        }
    }
}

// Errors are rendered on one line along with every underlying cause.
fn write_chain(fmt: &mut Formatter<'_>, error: &dyn Error) -> FmtResult {
    write!(fmt, "{error}")?;
    let mut cause = error.source();
    while let Some(inner) = cause {
        write!(fmt, ": {inner}")?;
        cause = inner.source();
    }

    Ok(())
}
