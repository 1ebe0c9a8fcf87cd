//! Config file parsing and `extends` resolution
//!
//! Files are parsed as JSONC (comments and trailing commas allowed, as in
//! real-world tsconfig files). An `extends` reference is resolved relative to
//! the referring document's directory and folded child-over-base; the chain
//! is walked with an explicit visited set so a cycle fails fast instead of
//! recursing forever.

use crate::config::document::ConfigDocument;
use crate::error::BridgeError;
use crate::host::{Host, normalize_path};
use crate::result::Result;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// Parses config files, recursively resolving their `extends` chains
pub struct ConfigParser<'h> {
    host: &'h dyn Host,
}

impl<'h> ConfigParser<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Parse `path` into a fully-inherited document
    ///
    /// When `explicit` is false a missing or unreadable file yields an empty
    /// document; an explicitly requested file that cannot be read fails with
    /// [`BridgeError::ConfigNotFound`]. A file that exists but is not valid
    /// JSONC always fails with [`BridgeError::ConfigParse`]. The returned
    /// document never carries `extends`.
    pub async fn parse(&self, path: &Path, explicit: bool) -> Result<ConfigDocument> {
        let mut visited = Vec::new();
        self.parse_inner(normalize_path(Path::new("/"), path), explicit, &mut visited)
            .await
    }

    fn parse_inner<'s>(
        &'s self,
        path: PathBuf,
        explicit: bool,
        visited: &'s mut Vec<PathBuf>,
    ) -> Pin<Box<dyn Future<Output = Result<ConfigDocument>> + Send + 's>> {
        Box::pin(async move {
            if visited.contains(&path) {
                let mut chain = visited.clone();
                chain.push(path);
                return Err(BridgeError::config_cycle(chain));
            }
            visited.push(path.clone());

            let text = match self.host.read_file(&path).await {
                Ok(text) => text,
                Err(err) if explicit => {
                    tracing::debug!("Explicit config unreadable: {}: {}", path.display(), err);
                    return Err(BridgeError::config_not_found(path));
                }
                Err(err) => {
                    tracing::debug!(
                        "No config at {}, using empty document: {}",
                        path.display(),
                        err
                    );
                    return Ok(ConfigDocument::default());
                }
            };

            let mut document: ConfigDocument = json5::from_str(&text)
                .map_err(|e| BridgeError::config_parse(&path, e.to_string()))?;

            if let Some(reference) = document.extends.take() {
                let base_dir = path.parent().unwrap_or(Path::new("/"));
                let base_path = resolve_extends_reference(base_dir, &reference);
                tracing::debug!(
                    "Resolving extends of {} -> {}",
                    path.display(),
                    base_path.display()
                );
                // An extends target is named by the user, so its absence is
                // an error, not an empty document
                let base = self.parse_inner(base_path, true, visited).await?;
                document = document.merged_over(base);
            }

            Ok(document)
        })
    }
}

/// Resolve an `extends` reference against the referring document's directory,
/// tolerating an omitted `.json` extension
fn resolve_extends_reference(base_dir: &Path, reference: &str) -> PathBuf {
    let mut resolved = normalize_path(base_dir, Path::new(reference));
    if resolved.extension().is_none() {
        resolved.set_extension("json");
    }
    resolved
}
