//! codebasetxt - Concatenate a codebase into a single text file.
//!
//! Usage:
//!   codebasetxt [ROOT]                 Write <ROOT>/codebase.txt
//!   codebasetxt [ROOT] -o out.txt      Write to a different file
//!   codebasetxt [ROOT] --list          Print the selected files instead
//!   codebasetxt --help                 Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use codebasetxt_bundle::BundleWriter;
use codebasetxt_core::{FileList, WalkConfig};
use codebasetxt_scan::TreeFilterWalker;

/// Default name of the aggregate document.
const DEFAULT_OUTPUT: &str = "codebase.txt";

#[derive(Parser)]
#[command(
    name = "codebasetxt",
    version,
    about = "Concatenate a codebase into a single text file",
    long_about = "codebasetxt walks a directory, honours its .gitignore, skips hidden \
                  directories, drizzle and node_modules paths, binary assets and lock \
                  files, and writes everything else into one document."
)]
struct Cli {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Ignore rules file (defaults to <ROOT>/.gitignore)
    #[arg(short = 'g', long = "gitignore")]
    rules_file: Option<PathBuf>,

    /// Output file (defaults to <ROOT>/codebase.txt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Visit directory entries in name order for reproducible output
    #[arg(long)]
    sort: bool,

    /// Follow symbolic links, skipping any that loop back to an ancestor
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// Print the selected files instead of writing the document
    #[arg(long)]
    list: bool,

    /// Format used by --list
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.canonicalize().context("Invalid root directory")?;

    let mut config = WalkConfig::new(&root);
    config.rules_file = cli.rules_file;
    config.follow_symlinks = cli.follow_symlinks;
    config.sort_entries = cli.sort;

    let walker = TreeFilterWalker::from_config(&config);
    let list = walker.walk(&root).context("Walk failed")?;

    if cli.list {
        print_list(&list, cli.format)?;
        return Ok(());
    }

    let output = cli.output.unwrap_or_else(|| root.join(DEFAULT_OUTPUT));
    run_bundle(&list, &output)
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Write the aggregate document and print a summary.
fn run_bundle(list: &FileList, output: &Path) -> Result<()> {
    let report = BundleWriter::new()
        .write_file(list, output)
        .context("Failed to write bundle")?;

    let warnings = list.warnings.len() + report.skipped.len();
    eprintln!(
        "Generated {} containing {} files ({}), {} warning(s)",
        output.display(),
        report.files_written,
        humansize::format_size(report.bytes_written, humansize::BINARY),
        warnings
    );

    Ok(())
}

/// Print the selected files.
fn print_list(list: &FileList, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for file in list {
                println!("{}", file.relative);
            }
            eprintln!(
                "{} files, {} pruned, walked in {:.2}s",
                list.len(),
                list.stats.total_pruned(),
                list.walk_duration.as_secs_f64()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(list)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["codebasetxt"]);

        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.rules_file.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.list);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "codebasetxt",
            "project",
            "-g",
            "rules.txt",
            "-o",
            "out.txt",
            "--sort",
            "-L",
            "--list",
            "--format",
            "json",
            "-vv",
        ]);

        assert_eq!(cli.root, PathBuf::from("project"));
        assert_eq!(cli.rules_file, Some(PathBuf::from("rules.txt")));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert!(cli.sort && cli.follow_symlinks && cli.list);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }
}
