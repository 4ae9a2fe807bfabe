//! Read modes controlling how a read interacts with tiered storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What a read does to the worker's tiered storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadType {
    /// Read without touching worker storage: no caching, migration or eviction.
    NoCache,
    /// Cache in the highest tier of a local worker. Data is never moved between tiers.
    #[default]
    Cache,
    /// Cache in a local worker and promote already-cached data to the top tier.
    CachePromote,
}

/// Storage behaviour derived from a [`ReadType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Leave worker storage untouched.
    NoStore,
    /// Store in the current tier.
    Store,
    /// Store and move to the top tier.
    Promote,
}

impl ReadType {
    /// Every read type, in wire-value order.
    pub const ALL: [Self; 3] = [Self::NoCache, Self::Cache, Self::CachePromote];

    /// Wire value of the read type.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::NoCache => 1,
            Self::Cache => 2,
            Self::CachePromote => 3,
        }
    }

    /// True for [`ReadType::Cache`] and [`ReadType::CachePromote`].
    #[must_use]
    pub const fn is_cache(self) -> bool {
        matches!(self, Self::Cache | Self::CachePromote)
    }

    /// True only for [`ReadType::CachePromote`].
    #[must_use]
    pub const fn is_promote(self) -> bool {
        matches!(self, Self::CachePromote)
    }

    #[must_use]
    pub const fn storage_type(self) -> StorageType {
        if self.is_promote() {
            StorageType::Promote
        } else if self.is_cache() {
            StorageType::Store
        } else {
            StorageType::NoStore
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::NoCache => "NO_CACHE",
            Self::Cache => "CACHE",
            Self::CachePromote => "CACHE_PROMOTE",
        }
    }
}

impl TryFrom<i32> for ReadType {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|read_type| read_type.value() == value)
            .ok_or_else(|| Error::invalid_argument(format!("unknown read type value {value}")))
    }
}

impl FromStr for ReadType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|read_type| read_type.name() == normalized)
            .ok_or_else(|| Error::invalid_argument(format!("unknown read type '{s}'")))
    }
}

impl fmt::Display for ReadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
