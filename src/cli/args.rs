//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kollect")]
#[command(author, version, about = "Run collection pipelines over JSON data", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Seed for random and shuffle stages
    #[arg(long, global = true, env = "KOLLECT_SEED")]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Run a pipeline over JSON input
    Run {
        /// The pipeline, e.g. "filter(age > 18) | pluck(name)"
        pipeline: String,

        /// JSON file to read; stdin when omitted
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Start from an empty collection instead of reading input
        #[arg(long, short = 'n', conflicts_with = "input")]
        null_input: bool,
    },

    /// Explain a pipeline without running it
    Explain {
        /// The pipeline to describe
        pipeline: String,
    },

    /// List the available stages
    Stages,
}
