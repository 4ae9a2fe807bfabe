//! Response objects returned by the file system master.

use serde::{Deserialize, Serialize};

/// Metadata for one file as reported by the master.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_id: i64,
    pub name: String,
    pub path: String,
    pub length: u64,
    pub block_size_bytes: u64,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_persisted: bool,
    #[serde(default)]
    pub is_completed: bool,
    /// Share of the file's blocks held in worker memory, 0 to 100.
    #[serde(default)]
    pub in_memory_percentage: u8,
}

/// Action the master asks a worker to take in reply to a heartbeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    #[default]
    Unknown,
    /// Nothing to do.
    Nothing,
    /// Re-register with the master.
    Register,
    /// Free the listed files from worker storage.
    Free,
    /// Delete the listed files.
    Delete,
    /// Persist the listed files to under storage.
    Persist,
}

/// Heartbeat reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemCommand {
    pub command_type: CommandType,
    #[serde(default)]
    pub persist_files: Vec<i64>,
}

impl FileSystemCommand {
    #[must_use]
    pub const fn nothing() -> Self {
        Self {
            command_type: CommandType::Nothing,
            persist_files: Vec::new(),
        }
    }

    #[must_use]
    pub const fn persist(files: Vec<i64>) -> Self {
        Self {
            command_type: CommandType::Persist,
            persist_files: files,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_command_deserializes_from_wire_json() {
        let command: FileSystemCommand =
            serde_json::from_str(r#"{"commandType": "PERSIST", "persistFiles": [7, 9]}"#).unwrap();
        assert_eq!(command, FileSystemCommand::persist(vec![7, 9]));
    }

    #[test]
    fn test_file_info_defaults_missing_flags() {
        let info: FileInfo = serde_json::from_str(
            r#"{"fileId": 3, "name": "part-0", "path": "/data/part-0", "length": 10, "blockSizeBytes": 4}"#,
        )
        .unwrap();
        assert_eq!(info.file_id, 3);
        assert!(!info.is_pinned);
        assert_eq!(info.in_memory_percentage, 0);
    }
}
