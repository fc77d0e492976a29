//! Atomic file writes for staged configuration and unit files.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `content` to `path` through a uniquely named temp file in the same
/// directory and a rename, so a reader never sees a half-written file and no
/// neighbouring file is touched. The result has exactly `mode`.
///
/// The temp file is removed on every error path when it is dropped.
pub(super) fn write_file_atomic(path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.as_file()
        .set_permissions(fs::Permissions::from_mode(mode))?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_content_with_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.service");

        write_file_atomic(&path, b"first", 0o644).unwrap();
        write_file_atomic(&path, b"second", 0o644).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(entries(dir.path()), ["unit.service"]);
    }

    #[test]
    fn sibling_with_tmp_extension_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let sibling = dir.path().join("config.tmp");
        fs::write(&sibling, b"operator data").unwrap();

        write_file_atomic(&path, b"{}", 0o644).unwrap();

        assert_eq!(fs::read(&sibling).unwrap(), b"operator data");
        assert_eq!(entries(dir.path()), ["config.json", "config.tmp"]);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), b"x").unwrap();

        assert!(write_file_atomic(&path, b"x", 0o644).is_err());

        assert_eq!(entries(dir.path()), ["occupied"]);
    }

    #[test]
    fn missing_parent_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent/unit.service");
        assert!(write_file_atomic(&path, b"x", 0o644).is_err());
    }
}
