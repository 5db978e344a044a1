/*!
 * Page Alignment
 * Rounds mapping offsets to the platform's mapping granularity
 */

use crate::core::limits::FALLBACK_PAGE_SIZE;
use std::sync::OnceLock;

/// Platform page size, queried once and cached
pub fn page_size() -> usize {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
    *PAGE_SIZE.get_or_init(query_page_size)
}

#[cfg(unix)]
fn query_page_size() -> usize {
    use nix::unistd::{sysconf, SysconfVar};

    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(size)) if size > 0 => usize::try_from(size).unwrap_or(FALLBACK_PAGE_SIZE),
        _ => FALLBACK_PAGE_SIZE,
    }
}

#[cfg(not(unix))]
fn query_page_size() -> usize {
    FALLBACK_PAGE_SIZE
}

/// A mapping window expressed in page-aligned terms
///
/// `aligned_offset + padding` is the requested offset; the view handed to
/// callers starts `padding` bytes into the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub aligned_offset: u64,
    pub padding: usize,
}

impl PageWindow {
    /// Round `offset` down to a multiple of `page_size`
    #[must_use]
    pub fn new(offset: u64, page_size: usize) -> Self {
        let page = page_size.max(1) as u64;
        let aligned_offset = (offset / page) * page;
        Self {
            aligned_offset,
            // remainder < page_size, so it fits in usize
            padding: (offset - aligned_offset) as usize,
        }
    }

    /// Window for the current platform page size
    #[must_use]
    pub fn for_offset(offset: u64) -> Self {
        Self::new(offset, page_size())
    }

    /// Offset the window was built for
    #[inline]
    #[must_use]
    pub const fn requested_offset(&self) -> u64 {
        self.aligned_offset + self.padding as u64
    }
}
