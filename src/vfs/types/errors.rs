/*!
 * VFS Error Types
 * Structured, type-safe error handling for mapper operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// VFS operation result
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// Existence and listing queries never produce these; only operations that
/// must deliver bytes or mutate the registry do. Every variant carries the
/// offending path (or handle) and a human-readable cause.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Opening \"{path}\" failed: {reason}")]
    #[diagnostic(
        code(vfs::open_failure),
        help("Check that the file exists, is not a directory and is readable.")
    )]
    OpenFailure { path: String, reason: String },

    #[error("Memory mapping \"{path}\" failed: {reason}")]
    #[diagnostic(
        code(vfs::map_failure),
        help("The address space or the mapping limit may be exhausted. Release unused mappings.")
    )]
    MapFailure { path: String, reason: String },

    #[error("File \"{path}\" cannot be read: {reason}")]
    #[diagnostic(code(vfs::stat_failure))]
    StatFailure { path: String, reason: String },

    #[error("Range at offset {offset} is outside \"{path}\" ({size} bytes)")]
    #[diagnostic(
        code(vfs::invalid_range),
        help("The offset must not exceed the file size.")
    )]
    InvalidRange { path: String, offset: u64, size: u64 },

    #[error("Invalid path: {0}")]
    #[diagnostic(code(vfs::invalid_path))]
    InvalidPath(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Mount point already in use: {0}")]
    #[diagnostic(code(vfs::already_mounted), help("Unmount the existing mapper first."))]
    AlreadyMounted(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Unknown mapper handle: {0}")]
    #[diagnostic(
        code(vfs::unknown_mapper),
        help("Handles are only valid for the registry that created them.")
    )]
    UnknownMapper(u32),

    #[error("No mapper for path: {0}")]
    #[diagnostic(code(vfs::no_mapper), help("Mount a mapper on a prefix of this path."))]
    NoMapper(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not supported: {0}")]
    #[diagnostic(code(vfs::not_supported))]
    NotSupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl VfsError {
    /// The named resource could not be opened
    pub fn open_failure(path: &Path, reason: impl Into<String>) -> Self {
        Self::OpenFailure {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// The OS mapping primitive failed after a successful open
    pub fn map_failure(path: &Path, reason: impl Into<String>) -> Self {
        Self::MapFailure {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Size or kind could not be determined
    pub fn stat_failure(path: &Path, reason: impl Into<String>) -> Self {
        Self::StatFailure {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Path the error refers to, if any
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::OpenFailure { path, .. }
            | Self::MapFailure { path, .. }
            | Self::StatFailure { path, .. }
            | Self::InvalidRange { path, .. } => Some(path),
            Self::InvalidPath(path) | Self::AlreadyMounted(path) | Self::NoMapper(path) => {
                Some(path)
            }
            Self::UnknownMapper(_) | Self::NotSupported(_) => None,
        }
    }
}

/// Describe an I/O error without exposing raw OS error codes
pub fn describe_io(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => "not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::OutOfMemory => "out of memory or mapping limit reached".to_string(),
        _ => e.to_string(),
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
