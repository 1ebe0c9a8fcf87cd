//! Pipeline orchestrator: from a compile request to a resolved program config
//!
//! Composition root for the configuration side: locator -> parser/extends ->
//! options merger -> file-set resolver, each stage feeding the next. Each
//! invocation is independent; nothing is cached across calls, so resolving
//! the same request twice against an unchanged filesystem yields equal
//! results.

use crate::config::{CompilerOptions, ConfigDocument, ConfigLocator, ConfigParser, OptionsMerger};
use crate::files::{FileSetResolver, SkippedDirectory};
use crate::host::Host;
use crate::result::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Caller input for configuration resolution
///
/// `compiler_options` recognizes the `project` key (path to a config file or
/// its containing directory) among arbitrary passthrough keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileRequest {
    pub cwd: Option<PathBuf>,
    pub files: Option<Vec<String>>,
    pub compiler_options: Option<CompilerOptions>,
}

impl CompileRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.compiler_options = Some(options);
        self
    }
}

/// The final `(files, compilerOptions)` pair, ready for the external engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProgramConfig {
    /// Unique absolute paths, insertion order = discovery order
    pub files: Vec<PathBuf>,
    /// Fully merged, normalized options
    pub compiler_options: CompilerOptions,
    /// Directories the file walk could not read
    pub skipped: Vec<SkippedDirectory>,
}

/// Run the full configuration-resolution pipeline
///
/// Fails with `ConfigNotFound` only when the request explicitly named a
/// config path (via the `project` option) that does not exist; a missing
/// discovered config means "defaults plus request overrides". Never prints.
pub async fn resolve_program_config(
    host: &dyn Host,
    request: &CompileRequest,
) -> Result<ResolvedProgramConfig> {
    let cwd = match &request.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
    };
    let project = request
        .compiler_options
        .as_ref()
        .and_then(CompilerOptions::project)
        .map(PathBuf::from);

    let config_path = ConfigLocator::locate(host, project.as_deref(), &cwd).await?;
    let document = match &config_path {
        Some(path) => {
            ConfigParser::new(host)
                .parse(path, project.is_some())
                .await?
        }
        None => {
            tracing::debug!("No config discovered under {}", cwd.display());
            ConfigDocument::default()
        }
    };

    // Files resolve against the config file's directory when one governs the
    // request, otherwise against the working directory
    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(cwd);

    let merged = OptionsMerger::merge(
        document,
        request.compiler_options.as_ref(),
        request.files.as_deref(),
    );
    let resolution = FileSetResolver::new(host)
        .resolve(
            &base_dir,
            merged.include.as_deref(),
            merged.exclude.as_deref(),
            merged.files.as_deref(),
        )
        .await;

    tracing::info!(
        "Resolved {} file(s) for {}",
        resolution.files.len(),
        base_dir.display()
    );

    Ok(ResolvedProgramConfig {
        files: resolution.files,
        compiler_options: merged.compiler_options,
        skipped: resolution.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptionValue;
    use crate::error::ErrorKind;
    use crate::host::MemoryHost;

    #[tokio::test]
    async fn test_config_governs_file_walk() {
        let host = MemoryHost::new()
            .with_file(
                "/proj/tsconfig.json",
                r#"{"include": ["src/**/*.ts"], "compilerOptions": {"strict": true}}"#,
            )
            .with_file("/proj/src/a.ts", "")
            .with_file("/proj/other/b.ts", "");

        let request = CompileRequest::new().with_cwd("/proj/src");
        let resolved = resolve_program_config(&host, &request).await.unwrap();

        assert_eq!(resolved.files, vec![PathBuf::from("/proj/src/a.ts")]);
        assert_eq!(
            resolved.compiler_options.get("strict"),
            Some(&OptionValue::Bool(true))
        );
    }

    #[tokio::test]
    async fn test_explicit_project_missing_rejects() {
        let host = MemoryHost::new().with_directory("/proj");
        let mut options = CompilerOptions::new();
        options.insert("project", OptionValue::Str("/nope".into()));

        let request = CompileRequest::new()
            .with_cwd("/proj")
            .with_compiler_options(options);
        let err = resolve_program_config(&host, &request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigNotFound);
    }
}
