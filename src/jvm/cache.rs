use std::path::Path;

use walkdir::WalkDir;

use crate::error::ReleaseError;

/// Total size of the files below `path`; zero when it does not exist.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Removes the download cache, returning the number of bytes freed.
pub fn clear(cache_dir: &Path) -> Result<u64, ReleaseError> {
    if !cache_dir.exists() {
        return Ok(0);
    }
    let size = dir_size(cache_dir);
    std::fs::remove_dir_all(cache_dir)?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dir_size_sums_nested_files() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a").join("b")).unwrap();
        std::fs::write(dir.path().join("a").join("one"), b"123").unwrap();
        std::fs::write(dir.path().join("a").join("b").join("two"), b"4567").unwrap();

        assert_eq!(dir_size(dir.path()), 7);
    }

    #[test]
    fn clear_removes_cache_and_reports_size() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("jdk");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("jdk.tar.gz"), b"archive").unwrap();

        assert_eq!(clear(&cache).unwrap(), 7);
        assert!(!cache.exists());
    }

    #[test]
    fn clear_missing_cache_is_noop() {
        let dir = tempdir().unwrap();
        assert_eq!(clear(&dir.path().join("missing")).unwrap(), 0);
    }
}
