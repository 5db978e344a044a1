/*!
 * File Memory
 * Read-only OS memory mapping of a whole file or a byte range of it
 */

use memmap2::{Mmap, MmapOptions};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::page::PageWindow;
use super::VirtualMemory;
use crate::vfs::types::{describe_io, VfsError, VfsResult};

/// Memory-mapped view of a file
///
/// Owns both the open file and the mapping; dropping the value unmaps and
/// closes them. The mapping starts on a page boundary at or before the
/// requested offset and the view skips the leading `padding` bytes, so the
/// first visible byte is always the byte at the requested offset.
///
/// Zero-length views (empty file, or an offset equal to the file size) hold
/// no mapping and no descriptor.
pub struct FileMemory {
    path: PathBuf,
    offset: u64,
    len: usize,
    padding: usize,
    // Unmapped before the file is closed
    map: Option<Mmap>,
    _file: Option<File>,
}

impl FileMemory {
    /// Map an entire file
    pub fn open(path: impl AsRef<Path>) -> VfsResult<Self> {
        Self::open_range(path, 0, 0)
    }

    /// Map `length` bytes starting at `offset`
    ///
    /// `length == 0` maps to the end of the file. A longer `length` is
    /// clamped to the bytes remaining after `offset`. An `offset` past the
    /// end of the file is an error.
    pub fn open_range(path: impl AsRef<Path>, offset: u64, length: u64) -> VfsResult<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| VfsError::open_failure(path, describe_io(&e)))?;
        let metadata = file
            .metadata()
            .map_err(|e| VfsError::stat_failure(path, describe_io(&e)))?;

        if metadata.is_dir() {
            return Err(VfsError::open_failure(path, "is a directory"));
        }

        let file_size = metadata.len();
        if offset > file_size {
            return Err(VfsError::InvalidRange {
                path: path.display().to_string(),
                offset,
                size: file_size,
            });
        }

        let remaining = file_size - offset;
        let size = if length == 0 {
            remaining
        } else {
            length.min(remaining)
        };

        if size == 0 {
            debug!(path = %path.display(), offset, "mapped empty range");
            return Ok(Self {
                path: path.to_path_buf(),
                offset,
                len: 0,
                padding: 0,
                map: None,
                _file: None,
            });
        }

        let window = PageWindow::for_offset(offset);
        let len = usize::try_from(size)
            .map_err(|_| VfsError::map_failure(path, "range exceeds the address space"))?;
        let map_len = len
            .checked_add(window.padding)
            .ok_or_else(|| VfsError::map_failure(path, "range exceeds the address space"))?;

        // SAFETY: the mapping is read-only and private to this value. Bytes
        // may still change underneath if another process truncates or writes
        // the file, which is the usual contract of file-backed mappings.
        let map = unsafe {
            MmapOptions::new()
                .offset(window.aligned_offset)
                .len(map_len)
                .map(&file)
        }
        .map_err(|e| VfsError::map_failure(path, describe_io(&e)))?;

        debug!(
            path = %path.display(),
            offset,
            size = len,
            aligned_offset = window.aligned_offset,
            "mapped file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            offset,
            len,
            padding: window.padding,
            map: Some(map),
            _file: Some(file),
        })
    }

    /// Host path of the mapped file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File offset of the first visible byte
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl VirtualMemory for FileMemory {
    fn as_slice(&self) -> &[u8] {
        match &self.map {
            Some(map) => &map[self.padding..self.padding + self.len],
            None => &[],
        }
    }
}

impl fmt::Debug for FileMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileMemory")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("size", &self.len)
            .field("mapped", &self.map.is_some())
            .finish()
    }
}

impl Drop for FileMemory {
    fn drop(&mut self) {
        if self.map.is_some() {
            debug!(path = %self.path.display(), size = self.len, "unmapping file");
        }
    }
}
