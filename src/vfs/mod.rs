/*!
 * Virtual File System Module
 * Read-only, path-addressed file access over pluggable mappers
 */

pub mod config;
pub mod file;
pub mod mapper;
pub mod memory;
pub mod paths;
pub mod traced;
pub mod traits;
pub mod types;

// Re-exports
pub use config::{FileMapperBuilder, FileMapperConfig};
pub use file::FileMapper;
pub use mapper::{Mapper, MapperId, Resolved};
pub use memory::{page_size, BufferMemory, FileMemory, PageWindow, VirtualMemory};
pub use traced::{MapperStats, TracedMapper};
pub use traits::{AbstractMapper, ContainerFactory, MapperBuilder};
pub use types::{FileFlags, FileIndex, FileInfo, VfsError, VfsResult};
