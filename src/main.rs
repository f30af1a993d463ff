use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeweave::cli::Output;
use codeweave::config::OutputFormat;

#[derive(Parser)]
#[command(name = "codeweave")]
#[command(
    version,
    about = "Structural analysis of multi-language codebases: symbols, interfaces and class hierarchies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze interface implementations and class hierarchies under a directory
    Analyze {
        #[arg(help = "Project root (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(short = 'f', long, help = "Output format: text, json, yaml")]
        format: Option<OutputFormat>,
        #[arg(short = 'o', long, help = "Write the report to a file")]
        output: Option<PathBuf>,
    },

    /// List the scope-qualified symbols declared in a file
    Symbols {
        #[arg(help = "Source file")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: OutputFormat,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        // Extract panic message
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcodeweave encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    // Install panic handler first
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    // Logs go to stderr so JSON/YAML on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(codeweave::cli::commands::analyze::run(path, format, output))?;
        }
        Commands::Symbols { file, format } => {
            codeweave::cli::commands::symbols::run(&file, format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                codeweave::cli::commands::config::show(format)?;
            }
            ConfigAction::Path => {
                codeweave::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                codeweave::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
