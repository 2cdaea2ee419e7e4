//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NeoWs asteroid feed ETL
#[derive(Parser, Debug)]
#[command(name = "neows")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML, or JSON by extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a date range from the feed and save it
    Extract {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day (YYYY-MM-DD), defaults to a week after start
        #[arg(long)]
        end: Option<String>,
    },

    /// Load one saved feed file into the database
    Load {
        /// File name in the data directory, or a path
        file: String,
    },

    /// Create the destination table
    Create,

    /// Extract a date range, then load it
    Pipeline {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last day (YYYY-MM-DD), defaults to a week after start
        #[arg(long)]
        end: Option<String>,
    },

    /// List saved feed files
    Files,

    /// Print the flattened records of a saved file without loading them
    Parse {
        /// File name in the data directory, or a path
        file: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from(["neows", "extract", "--start", "2024-01-01"]).unwrap();
        match cli.command {
            Commands::Extract { start, end } => {
                assert_eq!(start, "2024-01-01");
                assert!(end.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "neows",
            "pipeline",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-03",
            "-C",
            "custom.yaml",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Commands::Pipeline { end: Some(_), .. }));
    }

    #[test]
    fn test_parse_load_requires_file() {
        assert!(Cli::try_parse_from(["neows", "load"]).is_err());
        let cli = Cli::try_parse_from(["neows", "load", "feed.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Load { ref file } if file == "feed.json"));
    }

    #[test]
    fn test_parse_extract_requires_start() {
        assert!(Cli::try_parse_from(["neows", "extract"]).is_err());
    }
}
