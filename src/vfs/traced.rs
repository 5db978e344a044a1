/*!
 * Traced Mapper - Add spans and counters to any AbstractMapper
 * Decorator pattern to add observability without modifying existing mappers
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use super::memory::VirtualMemory;
use super::traits::AbstractMapper;
use super::types::*;
use crate::monitoring::OperationSpan;

/// Point-in-time operation counters of a [`TracedMapper`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperStats {
    pub is_file_calls: u64,
    pub is_directory_calls: u64,
    pub index_calls: u64,
    pub entries_listed: u64,
    pub mmap_calls: u64,
    pub mmap_failures: u64,
    pub bytes_mapped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    is_file_calls: AtomicU64,
    is_directory_calls: AtomicU64,
    index_calls: AtomicU64,
    entries_listed: AtomicU64,
    mmap_calls: AtomicU64,
    mmap_failures: AtomicU64,
    bytes_mapped: AtomicU64,
}

/// Wrapper that traces and counts every call to an inner mapper
pub struct TracedMapper<M: AbstractMapper> {
    /// Inner mapper implementation
    inner: M,

    counters: Counters,
}

impl<M: AbstractMapper> TracedMapper<M> {
    /// Wrap a mapper with tracing
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            counters: Counters::default(),
        }
    }

    /// Get reference to inner mapper
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> MapperStats {
        let c = &self.counters;
        MapperStats {
            is_file_calls: c.is_file_calls.load(Ordering::Relaxed),
            is_directory_calls: c.is_directory_calls.load(Ordering::Relaxed),
            index_calls: c.index_calls.load(Ordering::Relaxed),
            entries_listed: c.entries_listed.load(Ordering::Relaxed),
            mmap_calls: c.mmap_calls.load(Ordering::Relaxed),
            mmap_failures: c.mmap_failures.load(Ordering::Relaxed),
            bytes_mapped: c.bytes_mapped.load(Ordering::Relaxed),
        }
    }

    fn finish_mmap(
        &self,
        span: &OperationSpan,
        result: VfsResult<Box<dyn VirtualMemory>>,
    ) -> VfsResult<Box<dyn VirtualMemory>> {
        self.counters.mmap_calls.fetch_add(1, Ordering::Relaxed);
        match &result {
            Ok(memory) => {
                span.record_bytes(memory.size());
                span.record_result(true);
                self.counters
                    .bytes_mapped
                    .fetch_add(memory.size() as u64, Ordering::Relaxed);
            }
            Err(e) => {
                span.record_error(e);
                self.counters.mmap_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        result
    }
}

impl<M: AbstractMapper> AbstractMapper for TracedMapper<M> {
    fn is_file(&self, path: &str) -> bool {
        let span = OperationSpan::new("is_file", path);
        self.counters.is_file_calls.fetch_add(1, Ordering::Relaxed);
        let is_file = self.inner.is_file(path);
        span.record_result(true);
        is_file
    }

    fn is_directory(&self, path: &str) -> bool {
        let span = OperationSpan::new("is_directory", path);
        self.counters
            .is_directory_calls
            .fetch_add(1, Ordering::Relaxed);
        let is_directory = self.inner.is_directory(path);
        span.record_result(true);
        is_directory
    }

    fn get_index(&self, index: &mut FileIndex, path: &str) {
        let span = OperationSpan::new("get_index", path);
        let before = index.len();
        self.inner.get_index(index, path);
        let listed = index.len().saturating_sub(before) as u64;

        self.counters.index_calls.fetch_add(1, Ordering::Relaxed);
        self.counters
            .entries_listed
            .fetch_add(listed, Ordering::Relaxed);
        span.record_result(true);
    }

    fn mmap(&self, filename: &str) -> VfsResult<Box<dyn VirtualMemory>> {
        let span = OperationSpan::new("mmap", filename);
        let result = self.inner.mmap(filename);
        self.finish_mmap(&span, result)
    }

    fn mmap_range(
        &self,
        filename: &str,
        offset: u64,
        length: u64,
    ) -> VfsResult<Box<dyn VirtualMemory>> {
        let span = OperationSpan::new("mmap_range", filename);
        let result = self.inner.mmap_range(filename, offset, length);
        self.finish_mmap(&span, result)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
