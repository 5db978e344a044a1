/*!
 * Limits and Constants
 *
 * Centralized location for thresholds and magic numbers used by the mappers.
 * Organized by domain for discoverability.
 */

use std::time::Duration;

// =============================================================================
// MEMORY MAPPING
// =============================================================================

/// Page size assumed when the OS cannot be queried (4KB)
/// Mapping offsets are rounded down to a multiple of the page size
pub const FALLBACK_PAGE_SIZE: usize = 4 * 1024;

// =============================================================================
// PATHS
// =============================================================================

/// Virtual path segment separator
/// Also the directory marker at the end of a [`FileInfo`](crate::vfs::FileInfo) name
pub const PATH_SEPARATOR: char = '/';

/// Virtual root every normalized path starts from
pub const VIRTUAL_ROOT: &str = "/";

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Mapper operations slower than this are logged at warn level (10ms)
pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_millis(10);

/// Environment variable enabling JSON log output
pub const TRACE_JSON_ENV: &str = "MAPFS_TRACE_JSON";
