/*!
 * File Mapper Tests
 * Behavior of the plain-directory backend against a real temp directory
 */

use mapfs::vfs::{
    page_size, AbstractMapper, FileFlags, FileIndex, FileMapper, VfsError, VirtualMemory,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_pattern(path: &Path, len: usize) -> Vec<u8> {
    let data: Vec<u8> = (0..len).map(|i| (i % 253) as u8).collect();
    fs::write(path, &data).unwrap();
    data
}

#[test]
fn test_mmap_size_matches_file_size() {
    let temp = TempDir::new().unwrap();
    let mapper = FileMapper::new(temp.path());

    for (name, len) in [("tiny", 1usize), ("page", page_size()), ("odd", 12_345)] {
        let data = write_pattern(&temp.path().join(name), len);
        let memory = mapper.mmap(name).unwrap();
        assert_eq!(memory.size(), len);
        assert_eq!(memory.as_slice(), data.as_slice());
    }
}

#[test]
fn test_repeated_mapping_releases_descriptors() {
    let temp = TempDir::new().unwrap();
    write_pattern(&temp.path().join("cycle.bin"), 4096);
    let mapper = FileMapper::new(temp.path());

    // Comfortably above the usual 1024 descriptor soft limit
    for _ in 0..4096 {
        let memory = mapper.mmap("cycle.bin").unwrap();
        assert_eq!(memory.size(), 4096);
    }
}

#[test]
fn test_is_file_semantics() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a"), b"x").unwrap();
    fs::create_dir(temp.path().join("b")).unwrap();
    let mapper = FileMapper::new(temp.path());

    assert!(mapper.is_file("a"));
    assert!(!mapper.is_file("b"));
    assert!(!mapper.is_file("b/"));
    assert!(!mapper.is_file("nope"));
    assert!(!mapper.is_file("b/nope"));
}

#[test]
fn test_get_index_reports_files_and_directories() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a"), b"0123456789").unwrap();
    fs::create_dir(temp.path().join("b")).unwrap();
    let mapper = FileMapper::new(temp.path());

    let mut index = FileIndex::new();
    mapper.get_index(&mut index, "");
    assert_eq!(index.len(), 2);

    let a = index.get("a").unwrap();
    assert_eq!(a.size, 10);
    assert!(!a.flags.contains(FileFlags::DIRECTORY));

    let b = index.get("b/").unwrap();
    assert_eq!(b.size, 0);
    assert!(b.flags.contains(FileFlags::DIRECTORY));
}

#[test]
fn test_get_index_on_missing_directory_is_empty() {
    let temp = TempDir::new().unwrap();
    let mapper = FileMapper::new(temp.path());

    let mut index = FileIndex::new();
    mapper.get_index(&mut index, "does/not/exist");
    assert!(index.is_empty());

    // A file is not a directory either
    fs::write(temp.path().join("plain"), b"x").unwrap();
    mapper.get_index(&mut index, "plain");
    assert!(index.is_empty());
}

#[test]
fn test_get_index_appends_to_existing_entries() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("one")).unwrap();
    fs::create_dir_all(temp.path().join("two")).unwrap();
    fs::write(temp.path().join("one/x"), b"1").unwrap();
    fs::write(temp.path().join("two/y"), b"22").unwrap();
    let mapper = FileMapper::new(temp.path());

    let mut index = FileIndex::new();
    mapper.get_index(&mut index, "one");
    mapper.get_index(&mut index, "two/");
    let mut names: Vec<&str> = index.iter().map(|info| info.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_mmap_missing_file_is_open_failure() {
    let temp = TempDir::new().unwrap();
    let mapper = FileMapper::new(temp.path());

    match mapper.mmap("ghost.png") {
        Err(VfsError::OpenFailure { path, reason }) => {
            assert!(path.ends_with("ghost.png"));
            assert_eq!(reason, "not found");
        }
        other => panic!("expected OpenFailure, got {other:?}"),
    }
}

#[test]
fn test_unaligned_range_first_byte() {
    let temp = TempDir::new().unwrap();
    let page = page_size();
    let data = write_pattern(&temp.path().join("big.bin"), page * 4);
    let mapper = FileMapper::new(temp.path());

    for offset in [1usize, 7, page - 1, page + 1, 2 * page + 333] {
        let memory = mapper.mmap_range("big.bin", offset as u64, 64).unwrap();
        assert_eq!(memory.as_slice()[0], data[offset]);
        assert_eq!(memory.as_slice(), &data[offset..offset + 64]);
    }

    let tail = mapper.mmap_range("big.bin", (page + 5) as u64, 0).unwrap();
    assert_eq!(tail.size(), data.len() - page - 5);
    assert_eq!(tail.as_slice(), &data[page + 5..]);
}

#[test]
fn test_mappings_are_independent() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("first"), b"first file").unwrap();
    fs::write(temp.path().join("second"), b"second file").unwrap();
    let mapper = FileMapper::new(temp.path());

    let first = mapper.mmap("first").unwrap();
    let second = mapper.mmap("second").unwrap();
    drop(first);
    assert_eq!(second.as_slice(), b"second file");
}

#[test]
fn test_empty_file_maps_to_null_view() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("empty"), b"").unwrap();
    let mapper = FileMapper::new(temp.path());

    let memory = mapper.mmap("empty").unwrap();
    assert_eq!(memory.size(), 0);
    assert!(memory.address().is_null());
}

#[test]
fn test_parallel_queries_on_one_mapper() {
    let temp = TempDir::new().unwrap();
    for i in 0..8 {
        fs::write(temp.path().join(format!("f{i}")), vec![i as u8; 100 + i]).unwrap();
    }
    let mapper = FileMapper::new(temp.path());

    std::thread::scope(|scope| {
        for i in 0..8usize {
            let mapper = &mapper;
            scope.spawn(move || {
                let name = format!("f{i}");
                assert!(mapper.is_file(&name));
                let memory = mapper.mmap(&name).unwrap();
                assert_eq!(memory.size(), 100 + i);
                assert!(memory.as_slice().iter().all(|b| *b == i as u8));
            });
        }
    });
}
