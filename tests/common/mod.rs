#![allow(dead_code)]

use sizetree::tree::{ScanOutcome, Scanner, TreeNode};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Content written to every fixture file.
pub const FILE_BYTES: &[u8] = b"123456789";
pub const FILE_SIZE: u64 = FILE_BYTES.len() as u64;

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create 9-byte files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, FILE_BYTES).unwrap();
        }
    }
    tmp
}

/// `file1`, empty `dir1`, and `dir2` holding `file1` and `file2`.
pub fn reference_fixture() -> TempDir {
    create_fixture(&["file1", "dir1/", "dir2/file1", "dir2/file2"])
}

pub fn scan(path: &Path) -> ScanOutcome {
    Scanner::new().build(path).unwrap()
}

/// Check the size invariant of `node` against the directory on disk,
/// recomputing direct entry sizes with `symlink_metadata`.
pub fn assert_sizes_match_disk(node: &TreeNode, dir: &Path) {
    let mut files = 0u64;
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let meta = fs::symlink_metadata(entry.path()).unwrap();
        if meta.is_dir() {
            subdirs.push(entry.file_name());
        } else {
            files += meta.len();
        }
    }

    subdirs.sort();
    let children: Vec<_> = node.children.keys().cloned().collect();
    assert_eq!(children, subdirs, "children of {}", dir.display());

    let nested: u64 = node.children.values().map(|c| c.size).sum();
    assert_eq!(node.size, files + nested, "size of {}", dir.display());
    assert_eq!(node.files_size(), files, "file bytes of {}", dir.display());

    for (name, child) in &node.children {
        assert_sizes_match_disk(child, &dir.join(name));
    }
}

/// Render a full report to a string.
pub fn report_string(root: &TreeNode) -> String {
    let mut out = Vec::new();
    sizetree::report::write_report(&mut out, root, &Default::default()).unwrap();
    String::from_utf8(out).unwrap()
}
