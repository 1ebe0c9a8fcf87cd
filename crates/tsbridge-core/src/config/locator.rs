//! Configuration file discovery

use crate::error::BridgeError;
use crate::host::{Host, normalize_path};
use crate::result::Result;
use std::path::{Path, PathBuf};

/// The recognized config file name
pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// Locates the config file governing a compile request
pub struct ConfigLocator;

impl ConfigLocator {
    /// Auto-discover a config file by traversing upward from `start_dir`
    ///
    /// Moves up the directory tree until a `tsconfig.json` is found or the
    /// filesystem root is reached. Absence is not an error.
    pub async fn find_config_file(host: &dyn Host, start_dir: &Path) -> Option<PathBuf> {
        let mut current = normalize_path(Path::new("/"), start_dir);

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if host.file_exists(&candidate).await {
                tracing::debug!("Found config: {}", candidate.display());
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Resolve an explicitly requested project path, or auto-discover
    ///
    /// `project` may name the config file itself or a directory containing
    /// one; when it resolves to neither, the call fails with
    /// [`BridgeError::ConfigNotFound`]. Without an explicit path a missing
    /// config is simply `None`.
    pub async fn locate(
        host: &dyn Host,
        project: Option<&Path>,
        cwd: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(project) = project else {
            return Ok(Self::find_config_file(host, cwd).await);
        };

        let project = normalize_path(cwd, project);
        if host.file_exists(&project).await {
            return Ok(Some(project));
        }

        let in_directory = project.join(CONFIG_FILE_NAME);
        if host.file_exists(&in_directory).await {
            return Ok(Some(in_directory));
        }

        Err(BridgeError::config_not_found(project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::host::MemoryHost;

    #[tokio::test]
    async fn test_find_config_walks_upward() {
        let host = MemoryHost::new()
            .with_file("/proj/tsconfig.json", "{}")
            .with_directory("/proj/src/nested");

        let found = ConfigLocator::find_config_file(&host, Path::new("/proj/src/nested")).await;
        assert_eq!(found, Some(PathBuf::from("/proj/tsconfig.json")));
    }

    #[tokio::test]
    async fn test_find_config_absent() {
        let host = MemoryHost::new().with_directory("/proj/src");
        let found = ConfigLocator::find_config_file(&host, Path::new("/proj/src")).await;
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_locate_explicit_file_and_directory() {
        let host = MemoryHost::new().with_file("/proj/tsconfig.json", "{}");

        let by_file = ConfigLocator::locate(
            &host,
            Some(Path::new("/proj/tsconfig.json")),
            Path::new("/proj"),
        )
        .await
        .unwrap();
        assert_eq!(by_file, Some(PathBuf::from("/proj/tsconfig.json")));

        let by_dir = ConfigLocator::locate(&host, Some(Path::new("/proj")), Path::new("/"))
            .await
            .unwrap();
        assert_eq!(by_dir, Some(PathBuf::from("/proj/tsconfig.json")));
    }

    #[tokio::test]
    async fn test_locate_explicit_missing_fails() {
        let host = MemoryHost::new().with_directory("/proj");
        let err = ConfigLocator::locate(&host, Some(Path::new("/missing")), Path::new("/proj"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
    }
}
