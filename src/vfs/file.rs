/*!
 * File Mapper
 * Plain-directory backend mapping host files into memory
 */

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use super::config::FileMapperConfig;
use super::memory::{FileMemory, VirtualMemory};
use super::traits::AbstractMapper;
use super::types::*;

/// Mapper over a host directory tree
///
/// Holds only its base path, so queries can run concurrently from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct FileMapper {
    base: PathBuf,
    confine: bool,
}

impl FileMapper {
    /// Create a mapper rooted at `base`
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base: base.into(),
            confine: true,
        }
    }

    pub fn from_config(config: FileMapperConfig) -> Self {
        Self {
            base: config.base_path,
            confine: config.confine_to_base,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// Whether `..` is kept from leaving the base path
    pub fn confined(&self) -> bool {
        self.confine
    }

    /// Map a file by its mapper-relative name, keeping the concrete type
    pub fn map_file(&self, filename: &str) -> VfsResult<FileMemory> {
        FileMemory::open(self.resolve(filename))
    }

    /// Resolve a mapper-relative path to a host path
    ///
    /// Leading separators and `.` segments are dropped. When confined, a
    /// `..` pops the previous segment and is ignored at the base.
    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');

        let mut components: Vec<Component<'_>> = Vec::with_capacity(8);
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(_) => components.push(component),
                Component::ParentDir if self.confine => {
                    components.pop();
                }
                Component::ParentDir => components.push(component),
                // CurDir, RootDir and Windows prefixes
                _ => {}
            }
        }

        let mut result = self.base.clone();
        for component in components {
            result.push(component);
        }
        result
    }

    /// Describe one directory entry, or `None` if it cannot be stat'ed
    fn entry_info(name: String, full_path: &Path) -> Option<FileInfo> {
        // Follows symlinks so links list as what they point to
        match fs::metadata(full_path) {
            Ok(md) if md.is_dir() => Some(FileInfo::directory(name)),
            Ok(md) => Some(FileInfo::file(name, md.len())),
            Err(e) => {
                warn!(path = %full_path.display(), error = %e, "skipping entry that cannot be stat'ed");
                None
            }
        }
    }
}

impl AbstractMapper for FileMapper {
    fn is_file(&self, path: &str) -> bool {
        fs::metadata(self.resolve(path))
            .map(|md| !md.is_dir())
            .unwrap_or(false)
    }

    fn is_directory(&self, path: &str) -> bool {
        fs::metadata(self.resolve(path))
            .map(|md| md.is_dir())
            .unwrap_or(false)
    }

    fn get_index(&self, index: &mut FileIndex, path: &str) {
        let full_path = self.resolve(path);
        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %full_path.display(), "directory does not exist, listing as empty");
                return;
            }
            Err(e) => {
                warn!(path = %full_path.display(), error = %e, "directory not readable, listing as empty");
                return;
            }
        };

        let before = index.len();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(path = %full_path.display(), error = %e, "failed to read directory entry");
                    continue;
                }
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(name = ?raw, "skipping entry with non UTF-8 name");
                    continue;
                }
            };

            if let Some(info) = Self::entry_info(name, &entry.path()) {
                index.push(info);
            }
        }

        debug!(
            path = %full_path.display(),
            entries = index.len() - before,
            "listed directory"
        );
    }

    fn mmap(&self, filename: &str) -> VfsResult<Box<dyn VirtualMemory>> {
        Ok(Box::new(self.map_file(filename)?))
    }

    fn mmap_range(
        &self,
        filename: &str,
        offset: u64,
        length: u64,
    ) -> VfsResult<Box<dyn VirtualMemory>> {
        Ok(Box::new(FileMemory::open_range(
            self.resolve(filename),
            offset,
            length,
        )?))
    }

    fn name(&self) -> &str {
        "file"
    }
}
