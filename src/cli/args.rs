//! Command line argument parsing for the Vitrine CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Vitrine - topic classification and headline patterns for Discover titles
#[derive(Parser, Debug, Clone)]
#[command(name = "vitrine")]
#[command(about = "Classify content-discovery titles and mine their headline patterns")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VitrineArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "VITRINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Taxonomy file, overrides the configuration
    #[arg(long, value_name = "TAXONOMY_FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Pattern catalog file, overrides the configuration
    #[arg(long, value_name = "PATTERNS_FILE")]
    pub patterns: Option<PathBuf>,

    /// Disable semantic scoring (keyword-only classification)
    #[arg(long)]
    pub no_semantic: bool,

    /// Number of worker threads
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl VitrineArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify titles into categories
    Classify(InputArgs),

    /// Detect headline patterns in titles
    Patterns(InputArgs),

    /// Classify, detect patterns and report per-category insights
    Analyze(AnalyzeArgs),

    /// Load the taxonomy and pattern catalog and report problems
    Validate,
}

/// Arguments for commands reading titles
#[derive(Parser, Debug, Clone)]
pub struct InputArgs {
    /// File with one title per line, or `-` for stdin
    #[arg(value_name = "TITLES_FILE")]
    pub input: PathBuf,
}

/// Arguments for the analyze command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// File with one title per line, or `-` for stdin
    #[arg(value_name = "TITLES_FILE")]
    pub input: PathBuf,

    /// Leave the per-title records out of the report
    #[arg(long)]
    pub summary_only: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_command() {
        let args = VitrineArgs::try_parse_from(["vitrine", "classify", "titles.txt"]).unwrap();

        if let Command::Classify(input) = args.command {
            assert_eq!(input.input, PathBuf::from("titles.txt"));
        } else {
            panic!("Expected Classify command");
        }
        assert!(!args.no_semantic);
        assert!(args.threads.is_none());
    }

    #[test]
    fn test_global_options() {
        let args = VitrineArgs::try_parse_from([
            "vitrine",
            "--taxonomy",
            "tax.json",
            "--patterns",
            "pat.json",
            "--no-semantic",
            "-t",
            "4",
            "analyze",
            "-",
            "--summary-only",
        ])
        .unwrap();

        assert_eq!(args.taxonomy, Some(PathBuf::from("tax.json")));
        assert_eq!(args.patterns, Some(PathBuf::from("pat.json")));
        assert!(args.no_semantic);
        assert_eq!(args.threads, Some(4));
        if let Command::Analyze(analyze) = args.command {
            assert_eq!(analyze.input, PathBuf::from("-"));
            assert!(analyze.summary_only);
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = VitrineArgs::try_parse_from(["vitrine", "validate"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = VitrineArgs::try_parse_from(["vitrine", "-vvv", "validate"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        // Quiet flag
        let args = VitrineArgs::try_parse_from(["vitrine", "--quiet", "validate"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            VitrineArgs::try_parse_from(["vitrine", "--format", "json", "--pretty", "validate"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        assert!(VitrineArgs::try_parse_from(["vitrine", "--format", "yaml", "validate"]).is_err());
    }
}
