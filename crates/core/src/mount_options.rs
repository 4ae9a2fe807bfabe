//! Options applied when mounting an under-storage path into the namespace.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Mount configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MountOptions {
    read_only: bool,
    shared: bool,
}

impl MountOptions {
    /// Options with every flag cleared.
    #[must_use]
    pub const fn defaults() -> Self {
        Self {
            read_only: false,
            shared: false,
        }
    }

    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    #[must_use]
    pub const fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.shared
    }

    /// Convert to the representation sent to the master.
    #[must_use]
    pub const fn to_wire(&self) -> MountWireOptions {
        MountWireOptions {
            read_only: self.read_only,
            shared: self.shared,
        }
    }
}

impl From<MountWireOptions> for MountOptions {
    fn from(wire: MountWireOptions) -> Self {
        Self {
            read_only: wire.read_only,
            shared: wire.shared,
        }
    }
}

/// Wire form of [`MountOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountWireOptions {
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub shared: bool,
}

impl MountWireOptions {
    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializeFailed` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::serialize_failed("JSON", e.to_string()))
    }

    /// Deserialize from JSON. Missing flags default to `false`.
    ///
    /// # Errors
    ///
    /// Returns `Error::JsonParseFailed` if the input is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::json_parse_failed(e.to_string()))
    }
}
