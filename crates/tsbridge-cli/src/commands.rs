//! Command implementations

use anyhow::Context;
use std::path::PathBuf;
use tsbridge_core::{
    CompileRequest, CompilerOptions, ConfigLocator, ConfigParser, Console, DiagnosticsReport,
    OptionValue, OsHost, ReportRenderer, TokioProcessRunner, TranspileRequest, TscEngine,
};

/// Build a core compile request from CLI arguments
///
/// An explicit `--project` is carried as the `project` compiler option so the
/// resolver treats the path strictly.
fn build_request(
    files: Vec<String>,
    options: Vec<(String, OptionValue)>,
    project: Option<PathBuf>,
    cwd: Option<&PathBuf>,
) -> CompileRequest {
    let mut compiler_options = CompilerOptions::new();
    for (key, value) in options {
        compiler_options.insert(key, value);
    }
    if let Some(project) = project {
        compiler_options.insert(
            "project",
            OptionValue::Str(project.display().to_string()),
        );
    }

    let mut request = CompileRequest::new();
    if let Some(cwd) = cwd {
        request = request.with_cwd(cwd);
    }
    if !files.is_empty() {
        request = request.with_files(files);
    }
    if !compiler_options.is_empty() {
        request = request.with_compiler_options(compiler_options);
    }
    request
}

fn console_for(no_color: bool) -> Console {
    if no_color {
        Console::no_colors()
    } else {
        Console::new()
    }
}

/// Resolve the project, run the external compiler, and print the report
pub async fn compile_command(
    files: Vec<String>,
    options: Vec<(String, OptionValue)>,
    project: Option<PathBuf>,
    cwd: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    let request = build_request(files, options, project, cwd.as_ref());

    let host = OsHost::new();
    let mut engine = TscEngine::new(TokioProcessRunner);
    if let Some(cwd) = &cwd {
        engine = engine.with_cwd(cwd);
    }

    tsbridge_core::compile(&host, &engine, console_for(no_color), &request)
        .await
        .map_err(|e| match e {
            // The report is already on stdout; keep the failure line terse
            tsbridge_core::BridgeError::CompilationFailed { report } => {
                anyhow::anyhow!("compilation failed with {} error(s)", report.error.len())
            }
            other => other.into(),
        })
}

/// Transform a single file and write the result to stdout
pub async fn transpile_command(
    file: PathBuf,
    options: Vec<(String, OptionValue)>,
    diagnostics: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let code = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut compiler_options = CompilerOptions::new();
    for (key, value) in options {
        compiler_options.insert(key, value);
    }

    let request = TranspileRequest {
        code,
        compiler_options: (!compiler_options.is_empty()).then_some(compiler_options),
        file_name: file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        module_name: None,
        report_diagnostics: diagnostics,
    };

    let engine = TscEngine::new(TokioProcessRunner);
    let output = tsbridge_core::transpile(&engine, &request).await?;

    if let Some(reported) = output.diagnostics
        && !reported.is_empty()
    {
        let report = DiagnosticsReport::split(reported);
        let renderer = ReportRenderer::new(console_for(no_color));
        for line in renderer.format_report(&report) {
            eprintln!("{line}");
        }
    }

    print!("{}", output.output_text);
    Ok(())
}

/// Print the governing config document, or the fully resolved program
pub async fn config_show_command(
    resolved: bool,
    project: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> anyhow::Result<()> {
    let host = OsHost::new();

    if resolved {
        let request = build_request(Vec::new(), Vec::new(), project, cwd.as_ref());
        let program = tsbridge_core::resolve_program_config(&host, &request).await?;
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let cwd = match cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };

    match ConfigLocator::locate(&host, project.as_deref(), &cwd).await? {
        Some(path) => {
            let document = ConfigParser::new(&host)
                .parse(&path, project.is_some())
                .await?;
            println!("// {}", path.display());
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        None => {
            println!("No tsconfig.json found under {}", cwd.display());
        }
    }
    Ok(())
}
