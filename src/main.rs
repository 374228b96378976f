//! Pageload Insights CLI
//!
//! Offline analysis of page-load artifacts: ranks the elements behind
//! layout shifts in a trace and finds JavaScript modules shipped in more
//! than one bundle.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pageload_insights::commands::{
    display_version, execute_analyze, validate_args, validate_report_file, AnalyzeArgs,
};

/// Pageload Insights - layout-shift and duplicated-code analysis
#[derive(Parser, Debug)]
#[command(name = "pageload-insights")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace and/or a set of bundles
    Analyze {
        /// Trace JSON (`{"traceEvents": [...]}` or a bare event array)
        #[arg(short, long)]
        trace: Option<PathBuf>,

        /// Bundle manifest: JSON list of {url, script, map}
        #[arg(short, long)]
        bundles: Option<PathBuf>,

        /// TOML config file
        #[arg(short, long, env = "PAGELOAD_INSIGHTS_CONFIG")]
        config: Option<PathBuf>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Fold duplicated modules wasting fewer bytes into "Other"
        #[arg(long)]
        ignore_threshold: Option<u64>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            trace,
            bundles,
            config,
            output,
            ignore_threshold,
            summary,
        } => {
            let args = AnalyzeArgs {
                trace,
                bundles,
                config,
                output_json: output,
                ignore_threshold_bytes: ignore_threshold,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
