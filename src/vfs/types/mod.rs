/*!
 * VFS Types
 * Shared types for mapper operations
 */

mod errors;
mod file_index;
mod file_info;

pub use errors::{describe_io, VfsError, VfsResult};
pub use file_index::FileIndex;
pub use file_info::{FileFlags, FileInfo};
