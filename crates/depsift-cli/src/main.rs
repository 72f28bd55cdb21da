//! depsift CLI - duplicate dependency analyzer for npm projects.

mod commands;
mod formatters;
mod logging;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depsift")]
#[command(about = "Find duplicated and wasteful dependency installs in npm projects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Project directory or `npm pack` tarball to analyze
    ///
    /// Examples:
    ///   depsift                       # Analyze the current directory
    ///   depsift ../app                # Analyze another project
    ///   depsift my-lib-1.0.0.tgz      # Analyze a packed tarball
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Output format
    #[arg(short, long = "output", value_enum, default_value = "human")]
    format: OutputFormat,

    /// Output JSON format (alias for --output json)
    #[arg(long)]
    json: bool,

    /// Report packages with more than this many installed versions
    #[arg(long, value_name = "N")]
    threshold: Option<usize>,

    /// Plugins to run, in order (can be specified multiple times)
    #[arg(long = "plugin", value_name = "NAME")]
    plugins: Vec<String>,

    /// Configuration file path (defaults to <PATH>/depsift.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (overridden by the DEPSIFT_LOG environment variable)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Compare installed versions between two projects' lockfiles
    Diff {
        /// Project before the change
        base: PathBuf,

        /// Project after the change
        target: PathBuf,

        /// Output JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "✖".red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Diff { base, target, json }) => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            };
            commands::diff::run_diff(&base, &target, format)
        }
        None => commands::report::run_report(&commands::report::ReportRunOptions {
            path: cli.path,
            threshold: cli.threshold,
            plugins: cli.plugins,
            config: cli.config,
            format: if cli.json {
                OutputFormat::Json
            } else {
                cli.format
            },
        }),
    }
}
