/*!
 * VFS File Info
 * Backend-independent description of a single directory entry
 */

use crate::core::limits::PATH_SEPARATOR;
use crate::core::serde::{is_default, is_zero_u64};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Entry flag bits
///
/// Consumers that only care about `DIRECTORY` keep working when backends
/// set additional bits.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileFlags(u32);

impl FileFlags {
    pub const NONE: Self = Self(0);
    pub const DIRECTORY: Self = Self(0x01);
    /// Entry is itself a container that a mapper can be created for
    pub const CONTAINER: Self = Self(0x02);
    pub const ENCRYPTED: Self = Self(0x04);
    pub const COMPRESSED: Self = Self(0x08);

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for FileFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

/// A single directory entry as reported by a mapper
///
/// `name` is relative to the directory that was listed. Directory names end
/// with `/`; the suffix is the directory marker and always agrees with the
/// `DIRECTORY` flag when built through the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileInfo {
    pub name: String,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    #[serde(skip_serializing_if = "is_default", default)]
    pub flags: FileFlags,
}

impl FileInfo {
    /// Create an entry with explicit flags
    ///
    /// A `DIRECTORY` entry gets the trailing separator and zero size.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, flags: FileFlags) -> Self {
        if flags.contains(FileFlags::DIRECTORY) {
            let mut name = name.into();
            if !name.ends_with(PATH_SEPARATOR) {
                name.push(PATH_SEPARATOR);
            }
            Self {
                name,
                size: 0,
                flags,
            }
        } else {
            Self {
                name: name.into(),
                size,
                flags,
            }
        }
    }

    /// Create a plain file entry
    #[inline]
    #[must_use]
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self::new(name, size, FileFlags::NONE)
    }

    /// Create a directory entry
    #[inline]
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, 0, FileFlags::DIRECTORY)
    }

    #[inline]
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.flags.contains(FileFlags::DIRECTORY)
    }

    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.flags.contains(FileFlags::CONTAINER)
    }

    #[inline]
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.flags.contains(FileFlags::COMPRESSED)
    }

    #[inline]
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.flags.contains(FileFlags::ENCRYPTED)
    }

    /// Name without the directory marker
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix(PATH_SEPARATOR).unwrap_or(&self.name)
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_directory() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({} bytes)", self.name, self.size)
        }
    }
}
