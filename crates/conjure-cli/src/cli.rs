//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Conjure: turn survey exports into editable survey definitions
#[derive(Parser)]
#[command(name = "conjure")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer questions, apply edits, and write the results as JSON
    Convert {
        /// Path to the response file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON edit script to apply before converting
        #[arg(short, long, value_name = "SCRIPT")]
        edits: Option<PathBuf>,

        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep a random sample of this many respondents
        #[arg(long)]
        sample_size: Option<usize>,

        /// Seed for --sample-size (default 0)
        #[arg(long, requires = "sample_size")]
        seed: Option<u64>,
    },

    /// Print the survey definition as JSON
    Survey {
        /// Path to the response file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON edit script to apply first
        #[arg(short, long, value_name = "SCRIPT")]
        edits: Option<PathBuf>,
    },

    /// Show inferred questions and response statistics
    Inspect {
        /// Path to the response file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "conjure",
            "-v",
            "convert",
            "data.csv",
            "--edits",
            "edits.json",
            "--sample-size",
            "5",
            "--seed",
            "9",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Convert {
                file,
                edits,
                output,
                sample_size,
                seed,
            } => {
                assert_eq!(file, PathBuf::from("data.csv"));
                assert_eq!(edits, Some(PathBuf::from("edits.json")));
                assert!(output.is_none());
                assert_eq!(sample_size, Some(5));
                assert_eq!(seed, Some(9));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_seed_requires_sample_size() {
        assert!(Cli::try_parse_from(["conjure", "convert", "data.csv", "--seed", "3"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["conjure", "inspect", "data.csv", "--json", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
