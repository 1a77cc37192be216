//! The set of active profiles for a container build.

use std::collections::BTreeSet;
use std::fmt;

use wireplan_common::config::WireplanConfig;
use wireplan_common::constants::DEFAULT_PROFILE;
use wireplan_common::error::{Result, WireplanError};

/// A non-empty, order-irrelevant set of active profile names.
///
/// The reserved `default` profile is always treated as active, whether or
/// not it was listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profiles {
    names: BTreeSet<String>,
}

impl Profiles {
    /// Creates a profile set from a list of names.
    ///
    /// Duplicates are collapsed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfiles` if the list is empty or contains an empty name.
    pub fn from_list<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(WireplanError::InvalidProfiles {
                    message: "profile names must not be empty".into(),
                });
            }
            let _ = set.insert(name);
        }
        if set.is_empty() {
            return Err(WireplanError::InvalidProfiles {
                message: "at least one profile must be active".into(),
            });
        }
        Ok(Self { names: set })
    }

    /// Parses a delimited list such as `"default,dev"`, trimming each entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfiles` if the list is empty or contains an empty name.
    pub fn from_delimited_string(input: &str, delimiter: char) -> Result<Self> {
        Self::from_list(input.split(delimiter).map(str::trim))
    }

    /// Returns the profiles a configuration activates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfiles` if the configuration lists no profile or an
    /// empty name.
    pub fn from_config(config: &WireplanConfig) -> Result<Self> {
        Self::from_list(config.profiles.iter().map(String::as_str))
    }

    /// The set containing only `default`.
    #[must_use]
    pub fn default_only() -> Self {
        Self {
            names: BTreeSet::from([DEFAULT_PROFILE.to_owned()]),
        }
    }

    /// Returns the listed profile names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns the listed profile names as owned strings.
    #[must_use]
    pub fn to_list(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    /// Returns `true` if `profile` is active. `default` always is.
    #[must_use]
    pub fn is_active(&self, profile: &str) -> bool {
        profile == DEFAULT_PROFILE || self.names.contains(profile)
    }

    /// Returns `true` if a definition scoped to `candidates` applies.
    ///
    /// An empty candidate list carries no profile restriction and applies.
    #[must_use]
    pub fn is_any_active(&self, candidates: &[String]) -> bool {
        candidates.is_empty() || candidates.iter().any(|c| self.is_active(c))
    }

    /// Ranks a profile-scoped candidate against the active set.
    ///
    /// - `-1` for an empty candidate list, which ranks below everything;
    /// - `0` for exactly `["default"]`;
    /// - otherwise the number of non-default candidates that are active.
    #[must_use]
    pub fn priority_score(&self, candidates: &[String]) -> i32 {
        if candidates.is_empty() {
            return -1;
        }
        if candidates.len() == 1 && candidates[0] == DEFAULT_PROFILE {
            return 0;
        }
        let overlap = candidates
            .iter()
            .filter(|c| c.as_str() != DEFAULT_PROFILE)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|c| self.names.contains(c.as_str()))
            .count();
        i32::try_from(overlap).unwrap_or(i32::MAX)
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::default_only()
    }
}

impl fmt::Display for Profiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{}", names.join(", "))
    }
}
