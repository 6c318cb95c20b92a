// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile handling.
//!
//! A __profile__ is a named group of file mappings, where each mapping pairs a
//! source path (relative to the dotfiles directory) with a target path where
//! a symbolic link to that source should live. Profiles let the user keep,
//! say, a general purpose configuration next to a work specific one.
//!
//! # Merging Profiles
//!
//! The user may request several profiles at once. Requested profiles are
//! flattened into one [`FlatMapping`] by the following rules:
//!
//! 1. The default profile ([`DEFAULT_PROFILE`]) is always applied first, no
//!    matter where, or if, it appears in the requested list.
//! 2. Every other requested profile is applied in list order.
//! 3. When an applied entry lands on a target that some earlier entry already
//!    claimed, the earlier entry is dropped.
//!
//! Thus explicitly named profiles always beat the default profile, and later
//! names beat earlier ones. No two sources of a flattened mapping ever share a
//! target path.
//!
//! A source that a later profile maps to a new target releases its old target.
//! Claiming that old target afterwards only drops whatever source holds it at
//! that moment. So a source that moved away is never dropped by mistake.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Name of the mandatory profile that is applied first.
pub const DEFAULT_PROFILE: &str = "general";

/// Named set of source to target mappings.
///
/// Source paths are unique by construction. Iteration order is sorted by
/// source path.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(transparent)]
pub struct Profile(BTreeMap<String, String>);

impl Profile {
    /// Construct new profile from source and target pairs.
    ///
    /// A repeated source replaces the previous entry for that source.
    pub fn new(
        entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        )
    }

    /// Iterate through source and target pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    /// Target path mapped to given source path.
    pub fn get(&self, source: impl AsRef<str>) -> Option<&str> {
        self.0.get(source.as_ref()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Every profile defined by the mappings file, keyed by name.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(transparent)]
pub struct ProfileTable(BTreeMap<String, Profile>);

impl ProfileTable {
    /// Construct new profile table from name and profile pairs.
    pub fn new(profiles: impl IntoIterator<Item = (impl Into<String>, Profile)>) -> Self {
        Self(
            profiles
                .into_iter()
                .map(|(name, profile)| (name.into(), profile))
                .collect(),
        )
    }

    /// Lookup profile by name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&Profile> {
        self.0.get(name.as_ref())
    }

    /// Check if profile is defined.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.0.contains_key(name.as_ref())
    }

    /// Iterate through profile names and their profiles.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.0.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    /// Flatten requested profiles into one mapping.
    ///
    /// An empty request means the default profile only. See the
    /// [module documentation](self) for the override rules.
    ///
    /// # Errors
    ///
    /// - Return [`ProfileError::NotFound`] for the first requested profile
    ///   that is not defined. Nothing is merged in that case.
    #[instrument(skip(self, requested), level = "debug")]
    pub fn merge(
        &self,
        requested: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<FlatMapping> {
        let requested = requested
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect::<Vec<_>>();

        let mut flat = FlatMapping::default();
        if let Some(default) = self.get(DEFAULT_PROFILE) {
            debug!("apply profile {DEFAULT_PROFILE:?}");
            flat.apply(default);
        }

        for name in &requested {
            if name == DEFAULT_PROFILE {
                continue;
            }

            let profile = self
                .get(name)
                .ok_or_else(|| ProfileError::NotFound(name.clone()))?;
            debug!("apply profile {name:?}");
            flat.apply(profile);
        }

        Ok(flat)
    }
}

/// Source to target mapping with unique targets.
///
/// Produced by [`ProfileTable::merge`]. Iteration order is sorted by source
/// path.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct FlatMapping {
    by_source: BTreeMap<String, String>,
    by_target: HashMap<String, String>,
}

impl FlatMapping {
    /// Iterate through source and target pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_source
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    /// Target path mapped to given source path.
    pub fn get(&self, source: impl AsRef<str>) -> Option<&str> {
        self.by_source.get(source.as_ref()).map(String::as_str)
    }

    /// Source path currently claiming given target path.
    pub fn source_for(&self, target: impl AsRef<str>) -> Option<&str> {
        self.by_target.get(target.as_ref()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    fn apply(&mut self, profile: &Profile) {
        for (source, target) in profile.iter() {
            self.insert(source, target);
        }
    }

    // INVARIANT: by_target is always the exact inverse of by_source.
    fn insert(&mut self, source: &str, target: &str) {
        if let Some(superseded) = self.by_target.remove(target) {
            if superseded != source {
                debug!("{source:?} supersedes {superseded:?} at {target:?}");
                self.by_source.remove(&superseded);
            }
        }

        if let Some(previous) = self.by_source.insert(source.to_owned(), target.to_owned()) {
            if previous != target {
                self.by_target.remove(&previous);
            }
        }

        self.by_target.insert(target.to_owned(), source.to_owned());
    }
}

/// Split comma separated listing of profile names.
///
/// Names are trimmed, and blank names are dropped. Falls back to the default
/// profile when nothing is left.
pub fn parse_profile_list(list: impl AsRef<str>) -> Vec<String> {
    let names = list
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();

    if names.is_empty() {
        return vec![DEFAULT_PROFILE.to_owned()];
    }

    names
}

/// Profile resolution error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Requested profile is not defined.
    #[error("profile [{0}] not found in mappings file")]
    NotFound(String),
}

/// Friendly result alias :3
pub type Result<T, E = ProfileError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;
    use std::collections::HashSet;

    fn table() -> ProfileTable {
        ProfileTable::new([
            (
                "general",
                Profile::new([
                    ("git/general.gitconfig", "~/.gitconfig"),
                    ("vim/.vimrc", "~/.vimrc"),
                    ("zsh/.zshrc", "~/.zshrc"),
                ]),
            ),
            (
                "work",
                Profile::new([
                    ("git/work.gitconfig", "~/.gitconfig"),
                    ("ssh/work.config", "~/.ssh/config"),
                ]),
            ),
            (
                "laptop",
                Profile::new([
                    ("git/laptop.gitconfig", "~/.gitconfig"),
                    ("zsh/laptop.zshrc", "~/.zshrc"),
                ]),
            ),
        ])
    }

    fn entries(flat: &FlatMapping) -> Vec<(&str, &str)> {
        flat.iter().collect()
    }

    #[test]
    fn merge_default_only() -> anyhow::Result<()> {
        let result = table().merge(["general"])?;
        let expect = vec![
            ("git/general.gitconfig", "~/.gitconfig"),
            ("vim/.vimrc", "~/.vimrc"),
            ("zsh/.zshrc", "~/.zshrc"),
        ];
        pretty_assertions::assert_eq!(entries(&result), expect);

        Ok(())
    }

    #[test]
    fn merge_empty_request_means_default() -> anyhow::Result<()> {
        let table = table();
        let result = table.merge(Vec::<String>::new())?;
        pretty_assertions::assert_eq!(result, table.merge(["general"])?);

        Ok(())
    }

    #[test]
    fn merge_named_profile_overrides_default() -> anyhow::Result<()> {
        let result = table().merge(["general", "work"])?;
        let expect = vec![
            ("git/work.gitconfig", "~/.gitconfig"),
            ("ssh/work.config", "~/.ssh/config"),
            ("vim/.vimrc", "~/.vimrc"),
            ("zsh/.zshrc", "~/.zshrc"),
        ];
        pretty_assertions::assert_eq!(entries(&result), expect);
        pretty_assertions::assert_eq!(result.source_for("~/.gitconfig"), Some("git/work.gitconfig"));
        pretty_assertions::assert_eq!(result.get("git/general.gitconfig"), None);

        Ok(())
    }

    #[test]
    fn merge_later_profile_wins() -> anyhow::Result<()> {
        let table = table();

        let result = table.merge(["work", "laptop"])?;
        pretty_assertions::assert_eq!(result.source_for("~/.gitconfig"), Some("git/laptop.gitconfig"));
        pretty_assertions::assert_eq!(result.source_for("~/.zshrc"), Some("zsh/laptop.zshrc"));
        pretty_assertions::assert_eq!(result.source_for("~/.ssh/config"), Some("ssh/work.config"));

        let result = table.merge(["laptop", "work"])?;
        pretty_assertions::assert_eq!(result.source_for("~/.gitconfig"), Some("git/work.gitconfig"));
        pretty_assertions::assert_eq!(result.source_for("~/.zshrc"), Some("zsh/laptop.zshrc"));

        Ok(())
    }

    #[test_case(vec!["work", "general"]; "default listed last")]
    #[test_case(vec!["general", "work"]; "default listed first")]
    #[test_case(vec!["work"]; "default not listed")]
    #[test_case(vec!["general", "work", "general"]; "default listed twice")]
    #[test]
    fn merge_default_position_never_matters(requested: Vec<&str>) {
        let table = table();
        pretty_assertions::assert_eq!(table.merge(requested), table.merge(["work"]));
    }

    #[test]
    fn merge_missing_profile_fails() {
        let result = table().merge(["work", "doesnotexist", "laptop"]);
        pretty_assertions::assert_eq!(result, Err(ProfileError::NotFound("doesnotexist".into())));
    }

    #[test]
    fn merge_targets_are_unique() -> anyhow::Result<()> {
        let table = table();
        for requested in [
            vec!["general"],
            vec!["work"],
            vec!["laptop"],
            vec!["work", "laptop"],
            vec!["laptop", "work"],
            vec!["laptop", "general", "work"],
        ] {
            let result = table.merge(&requested)?;
            let targets = result.iter().map(|(_, target)| target).collect::<HashSet<_>>();
            pretty_assertions::assert_eq!(targets.len(), result.len(), "duplicate target for {requested:?}");
        }

        Ok(())
    }

    #[test]
    fn merge_collapses_duplicate_targets_in_default() -> anyhow::Result<()> {
        let table = ProfileTable::new([(
            "general",
            Profile::new([("a/vimrc", "~/.vimrc"), ("b/vimrc", "~/.vimrc")]),
        )]);
        let result = table.merge(["general"])?;
        pretty_assertions::assert_eq!(entries(&result), vec![("b/vimrc", "~/.vimrc")]);

        Ok(())
    }

    #[test]
    fn merge_repointed_source_keeps_unrelated_entries() -> anyhow::Result<()> {
        // "shared" moves away from ~/.a, so a later claim on ~/.a must not
        // drop "shared" from its new home at ~/.b.
        let table = ProfileTable::new([
            ("general", Profile::new([("shared", "~/.a")])),
            ("move", Profile::new([("shared", "~/.b")])),
            ("claim", Profile::new([("other", "~/.a")])),
        ]);
        let result = table.merge(["move", "claim"])?;
        let expect = vec![("other", "~/.a"), ("shared", "~/.b")];
        pretty_assertions::assert_eq!(entries(&result), expect);

        Ok(())
    }

    #[test]
    fn merge_without_default_profile_defined() -> anyhow::Result<()> {
        let table = ProfileTable::new([("work", Profile::new([("a", "~/.a")]))]);
        assert!(table.merge(["general"])?.is_empty());
        pretty_assertions::assert_eq!(entries(&table.merge(["work"])?), vec![("a", "~/.a")]);

        Ok(())
    }

    #[test_case("", vec!["general"]; "empty")]
    #[test_case("   ", vec!["general"]; "blank")]
    #[test_case("work", vec!["work"]; "single")]
    #[test_case("general,work,minimal", vec!["general", "work", "minimal"]; "many")]
    #[test_case("  general  ,  work  ,  minimal  ", vec!["general", "work", "minimal"]; "padded")]
    #[test_case("work,,laptop,", vec!["work", "laptop"]; "blank segments")]
    #[test]
    fn parse_profile_list_cases(input: &str, expect: Vec<&str>) {
        pretty_assertions::assert_eq!(parse_profile_list(input), expect);
    }
}
