/*!
 * mapfs Library
 * Read-only virtual filesystem over pluggable backends with zero-copy file access
 */

pub mod core;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use monitoring::{init_tracing, OperationSpan};
pub use vfs::{
    AbstractMapper, BufferMemory, ContainerFactory, FileFlags, FileIndex, FileInfo, FileMapper,
    FileMapperBuilder, FileMapperConfig, FileMemory, Mapper, MapperBuilder, MapperId, MapperStats,
    Resolved, TracedMapper, VfsError, VfsResult, VirtualMemory,
};
