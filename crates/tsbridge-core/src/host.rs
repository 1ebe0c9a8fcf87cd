//! Host capability: the filesystem primitives the resolution pipeline depends on
//!
//! Every resolution call receives an explicit [`Host`] rather than touching a
//! process-wide filesystem singleton, so tests can substitute an in-memory
//! implementation ([`MemoryHost`]).

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Immediate children of a directory, split into files and sub-directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntries {
    /// File names (not paths), sorted
    pub files: Vec<String>,
    /// Sub-directory names (not paths), sorted
    pub directories: Vec<String>,
}

/// Filesystem primitives injected into the resolution pipeline
#[async_trait]
pub trait Host: Send + Sync {
    /// Check whether `path` exists and is a regular file
    async fn file_exists(&self, path: &Path) -> bool;

    /// Read a file's full contents as UTF-8 text
    async fn read_file(&self, path: &Path) -> io::Result<String>;

    /// List a directory's immediate children
    ///
    /// Entries that cannot be stat'ed are skipped; a failure to read the
    /// directory itself is an error the caller may choose to swallow.
    async fn read_directory(&self, path: &Path) -> io::Result<DirectoryEntries>;

    /// Whether file names on this host are case sensitive
    fn use_case_sensitive_file_names(&self) -> bool;
}

/// Resolve `path` against `base` and collapse `.`/`..` components lexically
///
/// Used for extends-cycle keys and for turning config-relative references
/// into stable absolute paths without requiring the target to exist.
pub fn normalize_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Host backed by the real filesystem via `tokio::fs`
#[derive(Debug, Clone, Default)]
pub struct OsHost;

impl OsHost {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Host for OsHost {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn read_file(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn read_directory(&self, path: &Path) -> io::Result<DirectoryEntries> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = DirectoryEntries::default();

        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Some filesystems surface "." and ".." as ordinary entries
            if name == "." || name == ".." {
                continue;
            }
            // A stat failure on one entry must not fail the whole listing
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if file_type.is_file() {
                entries.files.push(name);
            } else if file_type.is_dir() {
                entries.directories.push(name);
            }
        }

        entries.files.sort();
        entries.directories.sort();
        Ok(entries)
    }

    fn use_case_sensitive_file_names(&self) -> bool {
        !cfg!(any(target_os = "windows", target_os = "macos"))
    }
}

/// In-memory host for tests
///
/// Paths are stored lexically normalized against `/`, so fixtures should use
/// absolute paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
    case_sensitive: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            case_sensitive: true,
            ..Self::default()
        }
    }

    /// Add a file, creating all parent directories
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let path = normalize_path(Path::new("/"), path.as_ref());
        let mut parent = path.parent();
        while let Some(dir) = parent {
            self.directories.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path, content.into());
        self
    }

    /// Add an empty directory
    pub fn with_directory(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize_path(Path::new("/"), path.as_ref());
        let mut parent = path.parent();
        while let Some(dir) = parent {
            self.directories.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.directories.insert(path);
        self
    }

    /// Mark a directory as unreadable: listing it fails with PermissionDenied
    pub fn with_unreadable_directory(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize_path(Path::new("/"), path.as_ref());
        self = self.with_directory(&path);
        self.unreadable.insert(path);
        self
    }
}

#[async_trait]
impl Host for MemoryHost {
    async fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(Path::new("/"), path))
    }

    async fn read_file(&self, path: &Path) -> io::Result<String> {
        let path = normalize_path(Path::new("/"), path);
        self.files
            .get(&path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    async fn read_directory(&self, path: &Path) -> io::Result<DirectoryEntries> {
        let path = normalize_path(Path::new("/"), path);
        if self.unreadable.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                path.display().to_string(),
            ));
        }
        if !self.directories.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                path.display().to_string(),
            ));
        }

        let mut entries = DirectoryEntries::default();
        for file in self.files.keys() {
            if file.parent() == Some(path.as_path())
                && let Some(name) = file.file_name()
            {
                entries.files.push(name.to_string_lossy().into_owned());
            }
        }
        for dir in &self.directories {
            if dir.parent() == Some(path.as_path())
                && let Some(name) = dir.file_name()
            {
                entries.directories.push(name.to_string_lossy().into_owned());
            }
        }

        entries.files.sort();
        entries.directories.sort();
        Ok(entries)
    }

    fn use_case_sensitive_file_names(&self) -> bool {
        self.case_sensitive
    }
}
