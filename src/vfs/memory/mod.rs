/*!
 * Virtual Memory
 * Owned, immutable byte views handed out by mappers
 */

mod file_memory;
mod page;

pub use file_memory::FileMemory;
pub use page::{page_size, PageWindow};

use std::fmt;
use std::sync::Arc;

/// Owned read-only view over a contiguous byte range
///
/// The implementor owns whatever backs the bytes (an OS mapping, a heap
/// buffer) and releases it on drop. Slices borrow the object, so no view can
/// outlive it. The extent is fixed at construction.
pub trait VirtualMemory: Send + Sync + fmt::Debug {
    /// The viewed bytes; empty for zero-length memory
    fn as_slice(&self) -> &[u8];

    /// Start of the view, null when the view is empty
    fn address(&self) -> *const u8 {
        let bytes = self.as_slice();
        if bytes.is_empty() {
            std::ptr::null()
        } else {
            bytes.as_ptr()
        }
    }

    /// Length of the view in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl AsRef<[u8]> for dyn VirtualMemory {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Heap-owned memory
///
/// Used by backends whose bytes do not live in a mappable file, such as
/// decompressed container entries.
#[derive(Clone, PartialEq, Eq)]
pub struct BufferMemory {
    data: Arc<[u8]>,
}

impl BufferMemory {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    /// Copy a slice into an owned buffer
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for BufferMemory {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for BufferMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferMemory")
            .field("size", &self.data.len())
            .finish()
    }
}

impl VirtualMemory for BufferMemory {
    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
