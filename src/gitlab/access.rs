//! GitLab access levels
//!
//! GitLab expresses a member's permissions as an integer `access_level`.
//! Each named level maps to exactly one rank, and levels compare by rank.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Named GitLab permission tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum AccessLevel {
    NoAccess,
    MinimalAccess,
    Guest,
    Planner,
    Reporter,
    Developer,
    Maintainer,
    Owner,
    Admin,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 9] = [
        AccessLevel::NoAccess,
        AccessLevel::MinimalAccess,
        AccessLevel::Guest,
        AccessLevel::Planner,
        AccessLevel::Reporter,
        AccessLevel::Developer,
        AccessLevel::Maintainer,
        AccessLevel::Owner,
        AccessLevel::Admin,
    ];

    /// GitLab's integer value for this level
    pub fn rank(self) -> u8 {
        match self {
            AccessLevel::NoAccess => 0,
            AccessLevel::MinimalAccess => 5,
            AccessLevel::Guest => 10,
            AccessLevel::Planner => 15,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Maintainer => 40,
            AccessLevel::Owner => 50,
            AccessLevel::Admin => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::NoAccess => "NO_ACCESS",
            AccessLevel::MinimalAccess => "MINIMAL_ACCESS",
            AccessLevel::Guest => "GUEST",
            AccessLevel::Planner => "PLANNER",
            AccessLevel::Reporter => "REPORTER",
            AccessLevel::Developer => "DEVELOPER",
            AccessLevel::Maintainer => "MAINTAINER",
            AccessLevel::Owner => "OWNER",
            AccessLevel::Admin => "ADMIN",
        }
    }

    /// Look up a level by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.rank() == rank)
    }

    /// Compare two levels by rank
    pub fn compare(a: Self, b: Self) -> Ordering {
        a.rank().cmp(&b.rank())
    }

    /// Guard predicate: is this level at or above `threshold`?
    pub fn at_least(self, threshold: Self) -> bool {
        self >= threshold
    }
}

impl Ord for AccessLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(*self, *other)
    }
}

impl PartialOrd for AccessLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<u8> for AccessLevel {
    type Error = String;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or_else(|| format!("unknown GitLab access level {}", rank))
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Callers see the name, GitLab sends the rank.
impl Serialize for AccessLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
