//! External compiler engine collaborators
//!
//! The engine is an external collaborator with a narrow contract: it takes a
//! resolved `(files, compilerOptions)` pair and answers with a flat
//! diagnostics list. Process invocation goes through the [`ProcessRunner`]
//! capability so tests can fake it and callers can swap in an in-process
//! engine.

use crate::config::{CompilerOptions, OptionValue};
use crate::diagnostics::{Diagnostic, DiagnosticCategory};
use crate::error::BridgeError;
use crate::resolver::ResolvedProgramConfig;
use crate::result::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Single-file, config-free transformation request
#[derive(Debug, Clone, Default)]
pub struct TranspileRequest {
    pub code: String,
    pub compiler_options: Option<CompilerOptions>,
    pub file_name: Option<String>,
    pub module_name: Option<String>,
    pub report_diagnostics: bool,
}

/// Output of a single-file transformation
#[derive(Debug, Clone, Default)]
pub struct TranspileOutput {
    pub output_text: String,
    pub diagnostics: Option<Vec<Diagnostic>>,
    pub source_map_text: Option<String>,
}

/// The external compiler engine's narrow contract
#[async_trait]
pub trait CompilerEngine: Send + Sync {
    /// Type-check and emit the resolved program, returning its flat
    /// diagnostics list (empty on a clean compile)
    async fn emit(&self, config: &ResolvedProgramConfig) -> Result<Vec<Diagnostic>>;

    /// Transform one module without any config resolution
    async fn transpile(&self, request: &TranspileRequest) -> Result<TranspileOutput>;
}

/// Output of one external process invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Capability for spawning external commands
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &str, args: &[String], cwd: Option<&Path>)
    -> Result<ProcessOutput>;
}

/// Runner backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        command: &str,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<ProcessOutput> {
        let mut cmd = tokio::process::Command::new(command);
        cmd.args(args);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| BridgeError::engine(format!("failed to spawn '{command}': {e}")))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Convert compiler options into command-line flags
///
/// `true` becomes `--key`, `false` becomes `--no-key`, scalars become
/// `--key value`, and lists repeat the flag per element. Structured values
/// have no flag form and are skipped with a warning.
pub fn args_from_options(options: &CompilerOptions) -> Vec<String> {
    let mut args = Vec::new();
    for (key, value) in options.iter() {
        match value {
            OptionValue::Bool(true) => args.push(format!("--{key}")),
            OptionValue::Bool(false) => args.push(format!("--no-{key}")),
            OptionValue::Int(n) => {
                args.push(format!("--{key}"));
                args.push(n.to_string());
            }
            OptionValue::Str(s) => {
                args.push(format!("--{key}"));
                args.push(s.clone());
            }
            OptionValue::List(items) => {
                for item in items {
                    args.push(format!("--{key}"));
                    args.push(item.clone());
                }
            }
            OptionValue::Other(_) => {
                tracing::warn!("Option '{}' has no command-line form, skipping", key);
            }
        }
    }
    args
}

/// Parse `tsc`-style diagnostic lines
///
/// Recognizes `path(line,col): error TS1234: message` and the file-less
/// `error TS1234: message` shape; unrecognized lines are ignored.
pub fn parse_tsc_diagnostics(output: &str) -> Vec<Diagnostic> {
    output.lines().filter_map(parse_tsc_line).collect()
}

fn parse_tsc_line(line: &str) -> Option<Diagnostic> {
    let line = line.trim();

    let (file, rest) = match line.find("): ") {
        Some(idx) if line[..idx].contains('(') => {
            let open = line[..idx].rfind('(')?;
            (Some(line[..open].to_string()), &line[idx + 3..])
        }
        _ => (None, line),
    };

    let (category_word, rest) = rest.split_once(' ')?;
    let category = match category_word {
        "error" => DiagnosticCategory::Error,
        "warning" => DiagnosticCategory::Warning,
        "message" | "info" => DiagnosticCategory::Message,
        _ => return None,
    };

    let (code_part, text) = rest.split_once(": ")?;
    let code = code_part.strip_prefix("TS")?.parse::<u32>().ok()?;

    let mut diagnostic = Diagnostic::new(category, text).with_code(code);
    diagnostic.file = file;
    Some(diagnostic)
}

/// Engine that shells out to an external `tsc` binary
pub struct TscEngine<R: ProcessRunner> {
    runner: R,
    cwd: Option<PathBuf>,
}

const TSC_BIN: &str = "tsc";

impl<R: ProcessRunner> TscEngine<R> {
    pub fn new(runner: R) -> Self {
        Self { runner, cwd: None }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Locate the compiler: prefer the project-local npm bin directory,
    /// fall back to `tsc` on the PATH on any failure
    async fn compiler_path(&self) -> String {
        let probe = self
            .runner
            .run("npm", &["bin".to_string()], self.cwd.as_deref())
            .await;

        match probe {
            Ok(output) if output.exit_code == 0 => {
                let bin_dir = output.stdout.trim();
                if bin_dir.is_empty() {
                    return TSC_BIN.to_string();
                }
                let local = Path::new(bin_dir).join(TSC_BIN);
                if local.is_file() {
                    local.display().to_string()
                } else {
                    TSC_BIN.to_string()
                }
            }
            _ => TSC_BIN.to_string(),
        }
    }
}

#[async_trait]
impl<R: ProcessRunner> CompilerEngine for TscEngine<R> {
    async fn emit(&self, config: &ResolvedProgramConfig) -> Result<Vec<Diagnostic>> {
        let compiler = self.compiler_path().await;

        let mut args: Vec<String> = config
            .files
            .iter()
            .map(|f| f.display().to_string())
            .collect();
        args.extend(args_from_options(&config.compiler_options));

        tracing::debug!("Invoking {} with {} arg(s)", compiler, args.len());
        let output = self.runner.run(&compiler, &args, self.cwd.as_deref()).await?;

        let mut diagnostics = parse_tsc_diagnostics(&output.stdout);
        diagnostics.extend(parse_tsc_diagnostics(&output.stderr));

        if diagnostics.is_empty() && output.exit_code != 0 {
            // Keep the failure surface printable even when the compiler's
            // output did not parse
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            diagnostics.push(Diagnostic::error(format!(
                "{compiler} exited with code {}: {detail}",
                output.exit_code
            )));
        }

        Ok(diagnostics)
    }

    async fn transpile(&self, request: &TranspileRequest) -> Result<TranspileOutput> {
        static SEQUENCE: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let work_dir = std::env::temp_dir().join(format!(
            "tsbridge-transpile-{}-{}",
            std::process::id(),
            SEQUENCE.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        ));
        tokio::fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| BridgeError::io(&work_dir, e))?;

        let file_name = request.file_name.as_deref().unwrap_or("module.ts");
        let input = work_dir.join(file_name);
        tokio::fs::write(&input, &request.code)
            .await
            .map_err(|e| BridgeError::io(&input, e))?;

        let compiler = self.compiler_path().await;
        let mut args = vec![
            input.display().to_string(),
            "--outDir".to_string(),
            work_dir.display().to_string(),
        ];
        if let Some(options) = &request.compiler_options {
            args.extend(args_from_options(options));
        }

        let output = self.runner.run(&compiler, &args, self.cwd.as_deref()).await?;
        let diagnostics = if request.report_diagnostics {
            let mut parsed = parse_tsc_diagnostics(&output.stdout);
            parsed.extend(parse_tsc_diagnostics(&output.stderr));
            Some(parsed)
        } else {
            None
        };

        let emitted = work_dir.join(Path::new(file_name).with_extension("js"));
        let output_text = tokio::fs::read_to_string(&emitted).await.unwrap_or_default();
        let source_map_text = tokio::fs::read_to_string(emitted.with_extension("js.map"))
            .await
            .ok();

        let _ = tokio::fs::remove_dir_all(&work_dir).await;

        Ok(TranspileOutput {
            output_text,
            diagnostics,
            source_map_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, OptionValue)]) -> CompilerOptions {
        let mut opts = CompilerOptions::new();
        for (key, value) in pairs {
            opts.insert(*key, value.clone());
        }
        opts
    }

    #[test]
    fn test_args_from_options_shapes() {
        let opts = options(&[
            ("strict", OptionValue::Bool(true)),
            ("sourceMap", OptionValue::Bool(false)),
            ("target", OptionValue::Str("ES2017".into())),
            ("maxNodeModuleJsDepth", OptionValue::Int(2)),
            ("lib", OptionValue::List(vec!["ES2017".into(), "DOM".into()])),
            ("paths", OptionValue::Other(serde_json::json!({"a": ["b"]}))),
        ]);

        assert_eq!(
            args_from_options(&opts),
            vec![
                "--strict",
                "--no-sourceMap",
                "--target",
                "ES2017",
                "--maxNodeModuleJsDepth",
                "2",
                "--lib",
                "ES2017",
                "--lib",
                "DOM",
            ]
        );
    }

    #[test]
    fn test_parse_tsc_line_with_position() {
        let parsed =
            parse_tsc_line("src/a.ts(3,10): error TS2322: Type 'string' is not assignable.")
                .unwrap();
        assert_eq!(parsed.category, DiagnosticCategory::Error);
        assert_eq!(parsed.file.as_deref(), Some("src/a.ts"));
        assert_eq!(parsed.code, Some(2322));
        assert_eq!(parsed.text, "Type 'string' is not assignable.");
    }

    #[test]
    fn test_parse_tsc_line_file_less() {
        let parsed = parse_tsc_line("error TS5058: The specified path does not exist.").unwrap();
        assert_eq!(parsed.file, None);
        assert_eq!(parsed.code, Some(5058));
    }

    #[test]
    fn test_parse_tsc_line_rejects_noise() {
        assert!(parse_tsc_line("Compiling 12 files...").is_none());
        assert!(parse_tsc_line("").is_none());
    }
}
