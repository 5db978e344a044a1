/*!
 * VFS File Index
 * Insertion-ordered directory listing filled in by mappers
 */

use super::file_info::{FileFlags, FileInfo};
use ahash::RandomState;
use std::collections::HashSet;

/// Directory listing populated by [`AbstractMapper::get_index`]
///
/// Entries keep the order in which the mapper emitted them. Names are unique
/// within the index; a second entry with an already-present name is ignored.
/// The index caches nothing across calls: callers create it, hand it to a
/// mapper and drop or [`clear`](Self::clear) it afterwards.
///
/// [`AbstractMapper::get_index`]: crate::vfs::AbstractMapper::get_index
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    entries: Vec<FileInfo>,
    names: HashSet<String, RandomState>,
}

impl FileIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry built from its parts
    ///
    /// Returns `false` when an entry with the same name is already present.
    pub fn emplace(&mut self, name: impl Into<String>, size: u64, flags: FileFlags) -> bool {
        self.push(FileInfo::new(name, size, flags))
    }

    /// Append an entry, keeping the first one on a name collision
    pub fn push(&mut self, info: FileInfo) -> bool {
        if !self.names.insert(info.name.clone()) {
            return false;
        }
        self.entries.push(info);
        true
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its listed name (directories include the `/`)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FileInfo> {
        if !self.names.contains(name) {
            return None;
        }
        self.entries.iter().find(|info| info.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileInfo> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FileInfo] {
        &self.entries
    }

    /// Entries that are not directories
    pub fn files(&self) -> impl Iterator<Item = &FileInfo> {
        self.entries.iter().filter(|info| !info.is_directory())
    }

    /// Directory entries
    pub fn directories(&self) -> impl Iterator<Item = &FileInfo> {
        self.entries.iter().filter(|info| info.is_directory())
    }

    /// Drop all entries so the index can be reused for another listing
    pub fn clear(&mut self) {
        self.entries.clear();
        self.names.clear();
    }
}

impl<'a> IntoIterator for &'a FileIndex {
    type Item = &'a FileInfo;
    type IntoIter = std::slice::Iter<'a, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for FileIndex {
    type Item = FileInfo;
    type IntoIter = std::vec::IntoIter<FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<FileInfo> for FileIndex {
    fn extend<I: IntoIterator<Item = FileInfo>>(&mut self, iter: I) {
        for info in iter {
            self.push(info);
        }
    }
}
