/*!
 * Mapper Registry
 * Owns mapper instances and routes virtual paths to them
 */

use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info};

use super::file::FileMapper;
use super::memory::VirtualMemory;
use super::paths::{self, normalize, strip_mount_prefix};
use super::traits::{AbstractMapper, ContainerFactory, MapperBuilder};
use super::types::*;

static NEXT_REGISTRY_TAG: AtomicU32 = AtomicU32::new(1);

/// Handle to a mapper owned by a [`Mapper`] registry
///
/// Only valid for the registry that issued it; other registries reject it
/// with [`VfsError::UnknownMapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapperId {
    registry: u32,
    index: u32,
}

impl MapperId {
    /// Position of the mapper in its registry, in creation order
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for MapperId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "mapper#{}", self.index)
    }
}

/// Outcome of routing a virtual path
pub struct Resolved<'a> {
    pub id: MapperId,
    pub mapper: &'a dyn AbstractMapper,
    /// Path relative to the mapper's root, without a leading separator
    pub path: String,
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("id", &self.id)
            .field("mapper", &self.mapper.name())
            .field("path", &self.path)
            .finish()
    }
}

/// Registry owning every mapper created through it
///
/// Mappers live until the registry is dropped and are reached through
/// [`MapperId`] handles or borrowed references, so none can outlive it.
/// Memory returned by `mmap` owns its own OS resources and stays valid
/// after the registry is gone.
///
/// Creating and mounting mappers needs `&mut self`; queries take `&self`
/// and can run from several threads once setup is done.
pub struct Mapper {
    tag: u32,
    mappers: Vec<Box<dyn AbstractMapper>>,
    mounts: HashMap<String, MapperId, RandomState>,
    mount_order: Vec<String>, // Longest prefixes first for proper resolution
}

impl Mapper {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tag: NEXT_REGISTRY_TAG.fetch_add(1, Ordering::Relaxed),
            mappers: Vec::new(),
            mounts: HashMap::with_hasher(RandomState::new()),
            mount_order: Vec::new(),
        }
    }

    /// Create a directory mapper rooted at `base_path`
    ///
    /// Every call creates a new, independent instance, even for a path that
    /// already has one.
    pub fn create_file_mapper<P: Into<PathBuf>>(&mut self, base_path: P) -> MapperId {
        let base_path = base_path.into();
        debug!(base_path = %base_path.display(), "creating file mapper");
        self.create_mapper(Box::new(FileMapper::new(base_path)))
    }

    /// Build a mapper from its builder and take ownership of it
    pub fn create_from_builder<B>(&mut self, builder: B) -> VfsResult<MapperId>
    where
        B: MapperBuilder,
        B::Output: 'static,
    {
        let mapper = builder.build()?;
        Ok(self.create_mapper(Box::new(mapper)))
    }

    /// Create a mapper over the bytes of a container
    pub fn create_container_mapper(
        &mut self,
        memory: Box<dyn VirtualMemory>,
        factory: &dyn ContainerFactory,
    ) -> VfsResult<MapperId> {
        debug!(
            format = factory.name(),
            size = memory.size(),
            "creating container mapper"
        );
        let mapper = factory.create(memory)?;
        Ok(self.create_mapper(mapper))
    }

    /// Map the container at virtual `path` and create a mapper for it
    ///
    /// The container's bytes come from whichever mapper `path` resolves to.
    pub fn open_container(
        &mut self,
        path: &str,
        factory: &dyn ContainerFactory,
    ) -> VfsResult<MapperId> {
        let memory = {
            let resolved = self.resolve(path)?;
            if !factory.accepts(&resolved.path) {
                return Err(VfsError::NotSupported(format!(
                    "{} is not a {} container",
                    normalize(path),
                    factory.name()
                )));
            }
            resolved.mapper.mmap(&resolved.path)?
        };
        self.create_container_mapper(memory, factory)
    }

    /// Take ownership of an already constructed mapper
    pub fn create_mapper(&mut self, mapper: Box<dyn AbstractMapper>) -> MapperId {
        let id = MapperId {
            registry: self.tag,
            index: self.mappers.len() as u32,
        };
        info!(id = %id, kind = mapper.name(), "mapper created");
        self.mappers.push(mapper);
        id
    }

    /// Borrow a mapper by handle
    pub fn get(&self, id: MapperId) -> VfsResult<&dyn AbstractMapper> {
        if id.registry != self.tag {
            return Err(VfsError::UnknownMapper(id.index));
        }
        self.mappers
            .get(id.index as usize)
            .map(|mapper| &**mapper)
            .ok_or(VfsError::UnknownMapper(id.index))
    }

    /// Number of mappers owned
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Handles of all owned mappers in creation order
    pub fn ids(&self) -> impl Iterator<Item = MapperId> + '_ {
        (0..self.mappers.len() as u32).map(move |index| MapperId {
            registry: self.tag,
            index,
        })
    }

    /// Route virtual paths under `prefix` to mapper `id`
    pub fn mount(&mut self, prefix: &str, id: MapperId) -> VfsResult<()> {
        self.get(id)?;
        let prefix = normalize(prefix);

        if self.mounts.contains_key(&prefix) {
            return Err(VfsError::AlreadyMounted(prefix));
        }

        debug!(prefix = %prefix, id = %id, "mounting mapper");
        self.mounts.insert(prefix.clone(), id);

        // Update mount order (longest prefixes first)
        self.mount_order.push(prefix);
        self.mount_order.sort_by(|a, b| b.len().cmp(&a.len()));

        Ok(())
    }

    /// Remove the route for `prefix`, returning the mapper it pointed to
    ///
    /// The mapper itself stays owned by the registry.
    pub fn unmount(&mut self, prefix: &str) -> VfsResult<MapperId> {
        let prefix = normalize(prefix);
        let id = self
            .mounts
            .remove(&prefix)
            .ok_or_else(|| VfsError::NoMapper(prefix.clone()))?;
        self.mount_order.retain(|p| p != &prefix);
        Ok(id)
    }

    /// Mounted prefixes with their mappers, longest prefix first
    pub fn mounts(&self) -> Vec<(String, MapperId)> {
        self.mount_order
            .iter()
            .filter_map(|prefix| self.mounts.get(prefix).map(|id| (prefix.clone(), *id)))
            .collect()
    }

    /// Resolve a virtual path to its mapper and mapper-relative path
    ///
    /// The longest mounted prefix covering the path wins.
    pub fn resolve(&self, path: &str) -> VfsResult<Resolved<'_>> {
        let normalized = normalize(path);

        for prefix in &self.mount_order {
            if let Some(rest) = strip_mount_prefix(&normalized, prefix) {
                let id = *self
                    .mounts
                    .get(prefix)
                    .ok_or_else(|| VfsError::NoMapper(normalized.clone()))?;
                let mapper = self.get(id)?;
                return Ok(Resolved {
                    id,
                    mapper,
                    path: rest.to_string(),
                });
            }
        }

        Err(VfsError::NoMapper(normalized))
    }

    /// True iff the virtual path names an existing non-directory
    pub fn is_file(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|resolved| resolved.mapper.is_file(&resolved.path))
            .unwrap_or(false)
    }

    /// True iff the virtual path names an existing directory
    ///
    /// Mount points and their ancestors count as directories even when no
    /// mapper backs them.
    pub fn is_directory(&self, path: &str) -> bool {
        let is_mapped_directory = self
            .resolve(path)
            .map(|resolved| resolved.mapper.is_directory(&resolved.path))
            .unwrap_or(false);
        if is_mapped_directory {
            return true;
        }

        let normalized = normalize(path);
        self.mount_order
            .iter()
            .any(|prefix| strip_mount_prefix(prefix, &normalized).is_some())
    }

    /// List a virtual directory
    ///
    /// Mount points below `path` are listed next to the entries of the
    /// mapper that owns `path`: a mount `/a/b/c` shows up as directory `a`
    /// when listing `/`. Unroutable paths without mounts below them list as
    /// empty.
    pub fn get_index(&self, index: &mut FileIndex, path: &str) {
        if let Ok(resolved) = self.resolve(path) {
            resolved.mapper.get_index(index, &resolved.path);
        }

        let parent = normalize(path);
        for prefix in &self.mount_order {
            if let Some(rest) = strip_mount_prefix(prefix, &parent) {
                if let Some(child) = paths::segments(rest).next() {
                    index.emplace(child, 0, FileFlags::DIRECTORY);
                }
            }
        }
    }

    /// Map the whole file at a virtual path
    pub fn mmap(&self, path: &str) -> VfsResult<Box<dyn VirtualMemory>> {
        let resolved = self.resolve(path)?;
        resolved.mapper.mmap(&resolved.path)
    }

    /// Map a byte range of the file at a virtual path
    pub fn mmap_range(
        &self,
        path: &str,
        offset: u64,
        length: u64,
    ) -> VfsResult<Box<dyn VirtualMemory>> {
        let resolved = self.resolve(path)?;
        resolved.mapper.mmap_range(&resolved.path, offset, length)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("mappers", &self.mappers.len())
            .field("mounts", &self.mount_order)
            .finish()
    }
}

impl Drop for Mapper {
    fn drop(&mut self) {
        debug!(mappers = self.mappers.len(), "releasing mapper registry");
    }
}
