//! tsbridge core
//!
//! Configuration resolution and diagnostics triage in front of an external
//! TypeScript compiler. This crate owns two pipelines: discovering and
//! merging project configuration into a `(files, compilerOptions)` pair, and
//! classifying/formatting the diagnostics the compiler reports back. The
//! compiler itself stays an external collaborator behind the
//! [`CompilerEngine`] trait.

pub mod compile;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod files;
pub mod host;
pub mod resolver;
pub mod result;

// Re-export commonly used types
pub use compile::{compile, transpile};
pub use config::{
    CONFIG_FILE_NAME, CompilerOptions, ConfigDocument, ConfigLocator, ConfigParser, MergedConfig,
    OptionValue, OptionsMerger, PROJECT_KEY,
};
pub use console::{Color, Console};
pub use diagnostics::{
    COMPILER_GROUP, Diagnostic, DiagnosticCategory, DiagnosticsReport, LineIndex, ReportRenderer,
    SourceMap, group_by_file,
};
pub use engine::{
    CompilerEngine, ProcessOutput, ProcessRunner, TokioProcessRunner, TranspileOutput,
    TranspileRequest, TscEngine, args_from_options,
};
pub use error::{BridgeError, ErrorKind};
pub use files::{FileSetResolution, FileSetResolver, MAX_WALK_DEPTH, SkippedDirectory};
pub use host::{DirectoryEntries, Host, MemoryHost, OsHost, normalize_path};
pub use resolver::{CompileRequest, ResolvedProgramConfig, resolve_program_config};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsbridge=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
