/*!
 * VFS Traits
 * Core mapper abstraction traits
 */

use super::memory::VirtualMemory;
use super::types::*;

/// Backend contract shared by every mapper
///
/// Paths are `/`-separated and relative to the mapper's own root. Queries
/// never fail: a path that cannot be found or read is simply not a file and
/// lists as empty. Materializing bytes through [`mmap`](Self::mmap) is the
/// only operation that reports errors.
pub trait AbstractMapper: Send + Sync {
    /// True iff `path` exists and is not a directory
    fn is_file(&self, path: &str) -> bool;

    /// True iff `path` exists and is a directory
    fn is_directory(&self, path: &str) -> bool;

    /// Append the entries of directory `path` to `index`
    ///
    /// A missing or unreadable directory appends nothing; this is
    /// indistinguishable from an empty directory.
    fn get_index(&self, index: &mut FileIndex, path: &str);

    /// Materialize the full contents of `filename`
    fn mmap(&self, filename: &str) -> VfsResult<Box<dyn VirtualMemory>>;

    /// Materialize `length` bytes of `filename` starting at `offset`
    ///
    /// `length == 0` means to the end of the file.
    fn mmap_range(
        &self,
        filename: &str,
        offset: u64,
        length: u64,
    ) -> VfsResult<Box<dyn VirtualMemory>> {
        let _ = (offset, length);
        Err(VfsError::NotSupported(format!(
            "{} mapper cannot map byte ranges of {}",
            self.name(),
            filename
        )))
    }

    /// Backend name for diagnostics
    fn name(&self) -> &str;
}

/// Mapper builder trait for configuration
pub trait MapperBuilder {
    type Output: AbstractMapper;

    /// Build the mapper instance
    fn build(self) -> VfsResult<Self::Output>;
}

/// Creates mappers over the bytes of a container file
///
/// A container mapper reads from an embedding [`VirtualMemory`] instead of
/// host paths and answers the same queries as any other mapper.
pub trait ContainerFactory: Send + Sync {
    /// Container format name
    fn name(&self) -> &str;

    /// True if `filename` looks like a container this factory understands
    fn accepts(&self, filename: &str) -> bool;

    /// Build a mapper that owns `memory` and serves its contents
    fn create(&self, memory: Box<dyn VirtualMemory>) -> VfsResult<Box<dyn AbstractMapper>>;
}
