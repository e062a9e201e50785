// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check: probe every reference found in the inputs
// - fetch: download URLs into a directory
//
// Flags shared by both live in `RunArgs` and are flattened into each one.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkpool",
    version,
    about = "Check document links and bulk-download URLs with a fixed worker pool",
    long_about = "linkpool fans a list of links out to a fixed number of workers, probes or \
                  downloads each one, and prints a sorted summary of what broke and why."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that every referenced link is reachable
    ///
    /// Example: linkpool check README.md docs/index.html 10.1000/xyz
    Check {
        /// Markdown/HTML documents, reference-list files, or raw URLs/DOIs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Base URL for resolving relative links in HTML documents
        #[arg(long)]
        base_url: Option<String>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Download URLs into a directory
    ///
    /// Example: linkpool fetch --output-dir papers http://x.com/a.pdf
    Fetch {
        /// URLs to download
        urls: Vec<String>,

        /// File with one URL per line
        #[arg(long)]
        file: Option<PathBuf>,

        /// Directory to write into (created if missing)
        #[arg(long, short = 'o')]
        output_dir: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of concurrent workers (overrides the config file)
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Only print the final summary
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Refuse invalid TLS certificates
    #[arg(long)]
    pub strict_tls: bool,

    /// Config file (default: ~/.config/linkpool/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
