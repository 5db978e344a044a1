/*!
 * Mapper Registry Tests
 * Ownership, routing and container plumbing through the registry
 */

use mapfs::vfs::{
    AbstractMapper, BufferMemory, ContainerFactory, FileFlags, FileIndex, FileMapperBuilder,
    FileMapperConfig, Mapper, MapperBuilder, TracedMapper, VfsError, VfsResult, VirtualMemory,
};
use std::fs;
use tempfile::TempDir;

/// Minimal container: `name size` header lines, a blank line, then the
/// concatenated entry bytes.
struct TableContainer {
    memory: Box<dyn VirtualMemory>,
    entries: Vec<(String, usize, usize)>,
}

impl TableContainer {
    fn parse(memory: Box<dyn VirtualMemory>) -> VfsResult<Self> {
        let bytes = memory.as_slice();
        let split = bytes
            .windows(2)
            .position(|w| w == b"\n\n")
            .ok_or_else(|| VfsError::InvalidPath("missing header terminator".into()))?;
        let header = std::str::from_utf8(&bytes[..split])
            .map_err(|_| VfsError::InvalidPath("header is not UTF-8".into()))?;

        let mut offset = split + 2;
        let mut entries = Vec::new();
        for line in header.lines() {
            let (name, size) = line
                .split_once(' ')
                .ok_or_else(|| VfsError::InvalidPath(format!("bad header line {line}")))?;
            let size: usize = size
                .parse()
                .map_err(|_| VfsError::InvalidPath(format!("bad size in {line}")))?;
            entries.push((name.to_string(), offset, size));
            offset += size;
        }
        Ok(Self { memory, entries })
    }

    fn find(&self, path: &str) -> Option<&(String, usize, usize)> {
        self.entries.iter().find(|(name, _, _)| name == path)
    }
}

impl AbstractMapper for TableContainer {
    fn is_file(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    fn is_directory(&self, path: &str) -> bool {
        path.is_empty()
    }

    fn get_index(&self, index: &mut FileIndex, path: &str) {
        if path.is_empty() {
            for (name, _, size) in &self.entries {
                index.emplace(name.as_str(), *size as u64, FileFlags::NONE);
            }
        }
    }

    fn mmap(&self, filename: &str) -> VfsResult<Box<dyn VirtualMemory>> {
        let (_, offset, size) = self
            .find(filename)
            .ok_or_else(|| VfsError::OpenFailure {
                path: filename.to_string(),
                reason: "not found".into(),
            })?;
        let bytes = &self.memory.as_slice()[*offset..*offset + *size];
        Ok(Box::new(BufferMemory::copy_from(bytes)))
    }

    fn name(&self) -> &str {
        "table"
    }
}

struct TableFactory;

impl ContainerFactory for TableFactory {
    fn name(&self) -> &str {
        "table"
    }

    fn accepts(&self, filename: &str) -> bool {
        filename.ends_with(".tbl")
    }

    fn create(&self, memory: Box<dyn VirtualMemory>) -> VfsResult<Box<dyn AbstractMapper>> {
        Ok(Box::new(TableContainer::parse(memory)?))
    }
}

fn asset_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("textures")).unwrap();
    fs::write(temp.path().join("textures/brick.png"), b"brick-bytes").unwrap();
    fs::write(temp.path().join("pack.tbl"), b"hello.txt 5\nworld.txt 6\n\nhelloworld!").unwrap();
    temp
}

#[test]
fn test_memory_outlives_registry() {
    let temp = asset_tree();
    let memory = {
        let mut registry = Mapper::new();
        let id = registry.create_file_mapper(temp.path());
        registry.mount("/", id).unwrap();
        registry.mmap("/textures/brick.png").unwrap()
    };
    assert_eq!(memory.as_slice(), b"brick-bytes");
}

#[test]
fn test_same_base_path_creates_independent_mappers() {
    let temp = asset_tree();
    let mut registry = Mapper::new();
    let a = registry.create_file_mapper(temp.path());
    let b = registry.create_file_mapper(temp.path());
    assert_ne!(a, b);

    registry.mount("/a", a).unwrap();
    registry.mount("/b", b).unwrap();
    assert!(registry.is_file("/a/textures/brick.png"));
    assert!(registry.is_file("/b/textures/brick.png"));
}

#[test]
fn test_registry_routing_with_file_mapper() {
    let temp = asset_tree();
    let mut registry = Mapper::new();
    let id = registry.create_file_mapper(temp.path());
    registry.mount("/assets", id).unwrap();

    assert!(registry.is_file("/assets/textures/brick.png"));
    assert!(registry.is_directory("/assets/textures"));
    assert!(!registry.is_file("/assets/textures"));

    let mut index = FileIndex::new();
    registry.get_index(&mut index, "/assets/textures");
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("brick.png").map(|info| info.size), Some(11));

    let err = registry.mmap("/assets/missing.png").unwrap_err();
    assert!(matches!(err, VfsError::OpenFailure { .. }));
    assert!(err.to_string().contains("missing.png"));
}

#[cfg(unix)]
#[test]
fn test_listed_backslash_name_opens_through_registry() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a\\b.png"), b"pixels").unwrap();

    let mut registry = Mapper::new();
    let root = registry.create_file_mapper(temp.path());
    registry.mount("/", root).unwrap();

    let mut index = FileIndex::new();
    registry.get_index(&mut index, "/");
    let names: Vec<&str> = index.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, vec!["a\\b.png"]);

    for info in &index {
        let path = format!("/{}", info.name);
        assert!(registry.is_file(&path));
        assert_eq!(registry.mmap(&path).unwrap().as_slice(), b"pixels");
    }
}

#[test]
fn test_open_container_through_registry() {
    let temp = asset_tree();
    let mut registry = Mapper::new();
    let root = registry.create_file_mapper(temp.path());
    registry.mount("/", root).unwrap();

    let pack = registry.open_container("/pack.tbl", &TableFactory).unwrap();
    registry.mount("/pack", pack).unwrap();
    assert_eq!(registry.get(pack).unwrap().name(), "table");

    assert!(registry.is_file("/pack/hello.txt"));
    assert_eq!(registry.mmap("/pack/world.txt").unwrap().as_slice(), b"world!");

    let mut index = FileIndex::new();
    registry.get_index(&mut index, "/pack");
    assert_eq!(index.len(), 2);

    // The root listing shows the file tree plus the mount point
    let mut root_index = FileIndex::new();
    registry.get_index(&mut root_index, "/");
    assert!(root_index.contains("pack.tbl"));
    assert!(root_index.contains("pack/"));
    assert!(root_index.contains("textures/"));
}

#[test]
fn test_open_container_rejects_unknown_format() {
    let temp = asset_tree();
    let mut registry = Mapper::new();
    let root = registry.create_file_mapper(temp.path());
    registry.mount("/", root).unwrap();

    let err = registry
        .open_container("/textures/brick.png", &TableFactory)
        .unwrap_err();
    assert!(matches!(err, VfsError::NotSupported(_)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_builder_and_traced_mapper_in_registry() {
    let temp = asset_tree();
    let mut registry = Mapper::new();

    let config: FileMapperConfig = serde_json::from_value(serde_json::json!({
        "base_path": temp.path(),
        "confine_to_base": true,
    }))
    .unwrap();
    let built = registry
        .create_from_builder(FileMapperBuilder::from_config(config))
        .unwrap();
    registry.mount("/built", built).unwrap();
    assert!(registry.is_file("/built/textures/../textures/brick.png"));

    let traced = TracedMapper::new(FileMapperBuilder::new(temp.path()).build().unwrap());
    let traced_id = registry.create_mapper(Box::new(traced));
    registry.mount("/traced", traced_id).unwrap();
    assert_eq!(
        registry.mmap("/traced/textures/brick.png").unwrap().size(),
        11
    );
}
