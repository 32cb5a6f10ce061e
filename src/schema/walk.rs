//! Bounded-depth recursive file discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Collect files under `root` whose names end in `suffix`, descending at
/// most `max_depth` directory levels. The bound guards against pathological
/// trees (symlink cycles, runaway nesting).
pub fn discover(root: &Path, suffix: &str, max_depth: usize) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut dirs = vec![root.to_path_buf()];
    let mut depth = 0;
    while !dirs.is_empty() && depth != max_depth {
        let mut subdirs = Vec::new();
        for dir in &dirs {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type()?.is_dir() {
                    subdirs.push(path);
                } else if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(suffix))
                {
                    found.push(path);
                }
            }
        }
        dirs = subdirs;
        depth += 1;
    }
    // read_dir order is platform-dependent; sort for a stable traversal
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.proto"), "").unwrap();
        fs::write(dir.path().join("a/nested.proto"), "").unwrap();
        fs::write(dir.path().join("a/b/deep.proto"), "").unwrap();
        fs::write(dir.path().join("a/readme.txt"), "").unwrap();

        let files = discover(dir.path(), ".proto", 10).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(files.len(), 3);
        assert!(names.contains(&"top.proto"));
        assert!(names.contains(&"nested.proto"));
        assert!(names.contains(&"deep.proto"));
        assert!(!names.contains(&"readme.txt"));
    }

    #[test]
    fn test_depth_bound() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("l1/l2")).unwrap();
        fs::write(dir.path().join("l1/one.proto"), "").unwrap();
        fs::write(dir.path().join("l1/l2/two.proto"), "").unwrap();

        let files = discover(dir.path(), ".proto", 2).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("one.proto"));
    }

    #[test]
    fn test_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("absent"), ".proto", 10).is_err());
    }
}
