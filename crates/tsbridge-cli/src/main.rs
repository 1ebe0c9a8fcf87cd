//! tsbridge CLI
//!
//! Command-line interface over the tsbridge resolution and compilation core

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tsbridge_core::{OptionValue, init_tracing};

#[derive(Parser)]
#[command(name = "tsbridge")]
#[command(about = "Config resolution and diagnostics front-end for the TypeScript compiler")]
#[command(version = tsbridge_core::VERSION)]
#[command(
    long_about = "tsbridge locates and merges tsconfig.json files (including their 'extends'\n\
chains), resolves the project file set, drives the external TypeScript\n\
compiler, and prints a triaged diagnostics report.\n\
\n\
Examples:\n  \
tsbridge compile                          # Compile the nearest project\n  \
tsbridge compile -O sourceMap=true        # Compile with an option override\n  \
tsbridge transpile src/util.ts            # Single-file transform, no config\n  \
tsbridge config show --resolved           # Inspect the resolved program"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to tsconfig.json or to a directory containing one
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Working directory for config discovery and file resolution
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the project and print the diagnostics report
    #[command(alias = "build")]
    Compile {
        /// Explicit source files (bypass include/exclude resolution)
        files: Vec<String>,

        /// Compiler option override, key=value (repeatable)
        #[arg(short = 'O', long = "option", value_parser = parse_option_override)]
        options: Vec<(String, OptionValue)>,
    },

    /// Transpile a single file without any config resolution
    Transpile {
        /// Source file to transform
        file: PathBuf,

        /// Compiler option override, key=value (repeatable)
        #[arg(short = 'O', long = "option", value_parser = parse_option_override)]
        options: Vec<(String, OptionValue)>,

        /// Report the transform's diagnostics on stderr
        #[arg(long)]
        diagnostics: bool,
    },

    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the governing config document
    Show {
        /// Print the fully resolved (files, compilerOptions) pair instead
        #[arg(long)]
        resolved: bool,
    },
}

/// Parse an option override in the format key=value
///
/// The value is read as a JSON5 scalar (so `true`, `2`, `"ES2017"` and
/// `["DOM","ES2017"]` all work); anything unparsable is kept as a string.
fn parse_option_override(s: &str) -> Result<(String, OptionValue), String> {
    let Some((key, raw)) = s.split_once('=') else {
        return Err(format!("Invalid option override '{s}'. Expected 'key=value'"));
    };
    if key.is_empty() {
        return Err(format!("Invalid option override '{s}'. Expected 'key=value'"));
    }

    let value = json5::from_str::<OptionValue>(raw)
        .unwrap_or_else(|_| OptionValue::Str(raw.to_string()));
    Ok((key.to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "tsbridge=error",
        1 => "tsbridge=warn",
        2 => "tsbridge=info",
        3 => "tsbridge=debug",
        _ => "tsbridge=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("tsbridge failed: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Compile { files, options } => {
            commands::compile_command(files, options, cli.project, cli.cwd, cli.no_color).await
        }

        Commands::Transpile {
            file,
            options,
            diagnostics,
        } => commands::transpile_command(file, options, diagnostics, cli.no_color).await,

        Commands::Config { action } => match action {
            ConfigAction::Show { resolved } => {
                commands::config_show_command(resolved, cli.project, cli.cwd).await
            }
        },

        Commands::Version => {
            println!("{}", tsbridge_core::VERSION);
            Ok(())
        }
    }
}
