//! Top-level compile and transpile operations
//!
//! `compile` is the only operation that prints: it always writes the triaged
//! diagnostics report before failing. `transpile` and
//! [`resolve_program_config`](crate::resolver::resolve_program_config) only
//! resolve or reject, leaving presentation to the caller.

use crate::console::Console;
use crate::diagnostics::{DiagnosticsReport, ReportRenderer, SourceMap};
use crate::engine::{CompilerEngine, TranspileOutput, TranspileRequest};
use crate::error::BridgeError;
use crate::host::Host;
use crate::resolver::{CompileRequest, resolve_program_config};
use crate::result::Result;
use std::collections::HashSet;
use std::path::Path;

/// Single-file, config-free transformation; no resolution pipeline involved
pub async fn transpile(
    engine: &dyn CompilerEngine,
    request: &TranspileRequest,
) -> Result<TranspileOutput> {
    engine.transpile(request).await
}

/// Run the full pipeline, invoke the engine, print the diagnostics report,
/// and fail iff the error bucket of the final report is non-empty
pub async fn compile(
    host: &dyn Host,
    engine: &dyn CompilerEngine,
    console: Console,
    request: &CompileRequest,
) -> Result<()> {
    let resolved = resolve_program_config(host, request).await?;
    tracing::info!("Compiling {} file(s)", resolved.files.len());

    let diagnostics = match engine.emit(&resolved).await {
        Ok(diagnostics) => diagnostics,
        Err(err) => {
            // Normalize an opaque engine failure into a one-element report
            // so the caller-visible failure surface is always printable
            let report = DiagnosticsReport::from_error_text(err.to_string());
            ReportRenderer::new(console).print_report(&report);
            return Err(err);
        }
    };

    let report = DiagnosticsReport::split(diagnostics);
    let sources = collect_sources(host, &report).await;
    ReportRenderer::new(console)
        .with_sources(sources)
        .print_report(&report);

    if report.has_errors() {
        Err(BridgeError::compilation_failed(report))
    } else {
        Ok(())
    }
}

/// Read the source text of every file named by the report, best-effort, so
/// positions can be rendered
async fn collect_sources(host: &dyn Host, report: &DiagnosticsReport) -> SourceMap {
    let mut sources = SourceMap::new();
    let mut seen = HashSet::new();

    for bucket in [&report.error, &report.warning, &report.message] {
        for diagnostic in bucket {
            let Some(file) = &diagnostic.file else {
                continue;
            };
            if !seen.insert(file.clone()) {
                continue;
            }
            if let Ok(text) = host.read_file(Path::new(file)).await {
                sources.insert(file.clone(), &text);
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::error::ErrorKind;
    use crate::host::MemoryHost;
    use async_trait::async_trait;
    use crate::resolver::ResolvedProgramConfig;

    struct FakeEngine {
        diagnostics: Vec<Diagnostic>,
        fail: bool,
    }

    #[async_trait]
    impl CompilerEngine for FakeEngine {
        async fn emit(&self, _config: &ResolvedProgramConfig) -> Result<Vec<Diagnostic>> {
            if self.fail {
                return Err(BridgeError::engine("engine crashed"));
            }
            Ok(self.diagnostics.clone())
        }

        async fn transpile(&self, _request: &TranspileRequest) -> Result<TranspileOutput> {
            Ok(TranspileOutput {
                output_text: "var x = 1;".to_string(),
                ..Default::default()
            })
        }
    }

    fn project_host() -> MemoryHost {
        MemoryHost::new().with_file("/proj/a.ts", "let x: number = 1;\n")
    }

    #[tokio::test]
    async fn test_compile_clean_succeeds() {
        let host = project_host();
        let engine = FakeEngine {
            diagnostics: vec![Diagnostic::warning("unused variable").with_location("/proj/a.ts", 4)],
            fail: false,
        };

        let request = CompileRequest::new().with_cwd("/proj");
        compile(&host, &engine, Console::no_colors(), &request)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_compile_rejects_on_error_bucket() {
        let host = project_host();
        let engine = FakeEngine {
            diagnostics: vec![
                Diagnostic::error("bad type").with_location("/proj/a.ts", 4).with_code(2322),
                Diagnostic::warning("meh"),
            ],
            fail: false,
        };

        let request = CompileRequest::new().with_cwd("/proj");
        let err = compile(&host, &engine, Console::no_colors(), &request)
            .await
            .unwrap_err();

        match err {
            BridgeError::CompilationFailed { report } => {
                assert_eq!(report.error.len(), 1);
                assert_eq!(report.warning.len(), 1);
            }
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_compile_surfaces_engine_failure() {
        let host = project_host();
        let engine = FakeEngine {
            diagnostics: Vec::new(),
            fail: true,
        };

        let request = CompileRequest::new().with_cwd("/proj");
        let err = compile(&host, &engine, Console::no_colors(), &request)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Engine);
    }

    #[tokio::test]
    async fn test_transpile_is_passthrough() {
        let engine = FakeEngine {
            diagnostics: Vec::new(),
            fail: false,
        };
        let output = transpile(&engine, &TranspileRequest::default()).await.unwrap();
        assert_eq!(output.output_text, "var x = 1;");
    }
}
