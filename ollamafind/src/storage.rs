use std::io;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tracing::trace;

/// Access to the local model cache.
///
/// The locator only ever reads through this trait so lookups can be
/// exercised without a real filesystem.
pub trait Storage {
    /// Returns true if nothing exists at `path`
    fn file_missing(&self, path: &Path) -> bool;

    fn dir_exists(&self, path: &Path) -> bool;

    /// Names of the entries in `path`, in the order the listing yields them
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    fn read_manifest(&self, path: &Path) -> io::Result<Bytes>;

    fn is_windows(&self) -> bool;

    /// Replace a leading `~` with the home directory and make the path absolute
    fn expand_path(&self, path: &Path) -> io::Result<PathBuf>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn file_missing(&self, path: &Path) -> bool {
        (**self).file_missing(path)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        (**self).dir_exists(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        (**self).read_dir(path)
    }

    fn read_manifest(&self, path: &Path) -> io::Result<Bytes> {
        (**self).read_manifest(path)
    }

    fn is_windows(&self) -> bool {
        (**self).is_windows()
    }

    fn expand_path(&self, path: &Path) -> io::Result<PathBuf> {
        (**self).expand_path(path)
    }
}

/// Storage backed by the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for FsStorage {
    fn file_missing(&self, path: &Path) -> bool {
        matches!(std::fs::metadata(path), Err(e) if e.kind() == io::ErrorKind::NotFound)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        trace!("listed {} entries in {}", names.len(), path.display());
        Ok(names)
    }

    fn read_manifest(&self, path: &Path) -> io::Result<Bytes> {
        std::fs::read(path).map(Bytes::from)
    }

    fn is_windows(&self) -> bool {
        cfg!(windows)
    }

    fn expand_path(&self, path: &Path) -> io::Result<PathBuf> {
        // `~foo` expands to `<home>/foo`
        let raw = path.to_string_lossy();
        let path = match raw.strip_prefix('~') {
            Some(rest) => {
                let home = dirs::home_dir().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "home directory not found")
                })?;
                home.join(rest.trim_start_matches(std::path::is_separator))
            }
            None => path.to_path_buf(),
        };

        let path = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };

        Ok(normalize(&path))
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_missing() {
        let storage = FsStorage::new();
        assert!(storage.file_missing(Path::new("/nonexistent/file")));

        let temp_dir = TempDir::new().unwrap();
        assert!(!storage.file_missing(temp_dir.path()));
    }

    #[test]
    fn test_dir_exists() {
        let storage = FsStorage::new();
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("latest");
        std::fs::write(&file, b"{}").unwrap();

        assert!(storage.dir_exists(temp_dir.path()));
        assert!(!storage.dir_exists(&file));
        assert!(!storage.dir_exists(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_read_dir_is_sorted() {
        let storage = FsStorage::new();
        let temp_dir = TempDir::new().unwrap();
        for name in ["v2", "latest", "7b"] {
            std::fs::write(temp_dir.path().join(name), b"{}").unwrap();
        }

        assert_eq!(
            storage.read_dir(temp_dir.path()).unwrap(),
            vec!["7b", "latest", "v2"]
        );
        assert!(storage.read_dir(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_read_manifest() {
        let storage = FsStorage::new();
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("latest");
        std::fs::write(&file, br#"{"layers":[]}"#).unwrap();

        assert_eq!(
            storage.read_manifest(&file).unwrap(),
            Bytes::from_static(br#"{"layers":[]}"#)
        );
        assert!(storage.read_manifest(Path::new("/idontexist")).is_err());
    }

    #[test]
    fn test_expand_path() {
        let storage = FsStorage::new();
        let expanded = storage.expand_path(Path::new("~/blah")).unwrap();

        assert!(expanded.is_absolute());
        assert!(expanded.ends_with("blah"));
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_tilde_prefix_without_separator() {
        let storage = FsStorage::new();
        let home = dirs::home_dir().unwrap();

        assert_eq!(storage.expand_path(Path::new("~foo")).unwrap(), normalize(&home.join("foo")));
        assert_eq!(storage.expand_path(Path::new("~")).unwrap(), normalize(&home));
    }

    #[test]
    fn test_expand_relative_path() {
        let storage = FsStorage::new();
        let expanded = storage.expand_path(Path::new("./models/../blobs")).unwrap();

        assert_eq!(expanded, std::env::current_dir().unwrap().join("blobs"));
    }

    #[test]
    fn test_is_windows() {
        assert_eq!(FsStorage::new().is_windows(), cfg!(windows));
    }
}
