//! Source file-set resolution
//!
//! Expands include/exclude glob patterns against the host filesystem into a
//! concrete, deduplicated list of absolute source paths. The walk goes
//! through [`Host::read_directory`] at every level; an unreadable
//! sub-directory is recorded and skipped, never fatal.

use crate::host::{Host, normalize_path};
use glob::{MatchOptions, Pattern};
use indexmap::IndexSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory depth limit for the recursive walk
pub const MAX_WALK_DEPTH: usize = 64;

/// Include patterns used when the config provides none
const DEFAULT_INCLUDE: &[&str] = &["**/*.ts", "**/*.tsx"];

/// Always excluded unless an include pattern asks for it
const DEFAULT_EXCLUDE: &[&str] = &["**/node_modules/**"];

/// A directory the walk could not read, with the failure it swallowed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDirectory {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of file-set resolution: the matched files plus what was skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSetResolution {
    /// Unique absolute paths, in discovery order
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedDirectory>,
}

/// Resolves include/exclude/file lists into concrete source paths
pub struct FileSetResolver<'h> {
    host: &'h dyn Host,
}

impl<'h> FileSetResolver<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    /// Resolve the file set rooted at `base_dir`
    ///
    /// A non-empty `explicit` list wins outright: each entry is resolved
    /// against `base_dir` and used verbatim, not filtered by excludes.
    /// Otherwise the directory tree is walked and matched against the
    /// include/exclude patterns (falling back to the TypeScript-source
    /// defaults when `include` is absent).
    pub async fn resolve(
        &self,
        base_dir: &Path,
        include: Option<&[String]>,
        exclude: Option<&[String]>,
        explicit: Option<&[String]>,
    ) -> FileSetResolution {
        if let Some(explicit) = explicit
            && !explicit.is_empty()
        {
            let mut files = IndexSet::new();
            for file in explicit {
                files.insert(normalize_path(base_dir, Path::new(file)));
            }
            return FileSetResolution {
                files: files.into_iter().collect(),
                skipped: Vec::new(),
            };
        }

        let match_options = MatchOptions {
            case_sensitive: self.host.use_case_sensitive_file_names(),
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };

        let include_patterns = compile_patterns(include.unwrap_or(&[]), DEFAULT_INCLUDE);
        let mut exclude_sources: Vec<String> =
            exclude.map(<[String]>::to_vec).unwrap_or_default();
        let includes_node_modules = include
            .unwrap_or(&[])
            .iter()
            .any(|p| p.contains("node_modules"));
        if !includes_node_modules {
            exclude_sources.extend(DEFAULT_EXCLUDE.iter().map(|p| (*p).to_string()));
        }
        let exclude_patterns = compile_patterns(&exclude_sources, &[]);
        // A pattern like `**/node_modules/**` also prunes the directory itself
        let prune_patterns: Vec<Pattern> = exclude_sources
            .iter()
            .filter_map(|p| p.strip_suffix("/**"))
            .filter_map(|p| Pattern::new(p).ok())
            .collect();

        let base_dir = normalize_path(Path::new("/"), base_dir);
        let mut files = IndexSet::new();
        let mut skipped = Vec::new();

        // Depth-first walk; sub-directories pushed in reverse so they pop in
        // listing order
        let mut stack = vec![(base_dir.clone(), 0usize)];
        while let Some((dir, depth)) = stack.pop() {
            let entries = match self.host.read_directory(&dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("Skipping unreadable directory {}: {}", dir.display(), err);
                    skipped.push(SkippedDirectory {
                        path: dir,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for file in &entries.files {
                let path = dir.join(file);
                let relative = relative_to(&path, &base_dir);
                if matches_any(&include_patterns, &relative, match_options)
                    && !matches_any(&exclude_patterns, &relative, match_options)
                {
                    files.insert(path);
                }
            }

            if depth >= MAX_WALK_DEPTH {
                tracing::warn!("Walk depth limit reached under {}", dir.display());
                continue;
            }

            for sub in entries.directories.iter().rev() {
                let path = dir.join(sub);
                let relative = relative_to(&path, &base_dir);
                if matches_any(&prune_patterns, &relative, match_options) {
                    continue;
                }
                stack.push((path, depth + 1));
            }
        }

        FileSetResolution {
            files: files.into_iter().collect(),
            skipped,
        }
    }
}

fn compile_patterns(sources: &[String], fallback: &[&str]) -> Vec<Pattern> {
    let compiled: Vec<Pattern> = sources
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                tracing::warn!("Ignoring invalid glob pattern '{}': {}", p, err);
                None
            }
        })
        .collect();

    if compiled.is_empty() && sources.is_empty() {
        fallback
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    } else {
        compiled
    }
}

fn matches_any(patterns: &[Pattern], relative: &str, options: MatchOptions) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_with(relative, options))
}

fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
