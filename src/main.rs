// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and load the config file
// 2. Turn the inputs into references (or URLs for fetch)
// 3. Hand them to the worker pool and wait, watching for Ctrl-C
// 4. Print the summary
// 5. Exit with proper code (0 = nothing broken, 1 = broken links, 2 = error)
// =============================================================================

mod checker; // src/checker/ - HTTP client, outcomes, check/fetch runs
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - TOML config file
mod logging; // src/logging.rs - tracing setup
mod pool; // src/pool/ - worker pool and result aggregation
mod report; // src/report.rs - summary output
mod sources; // src/sources/ - references from documents and lists

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use std::path::PathBuf;

use checker::{LinkClient, RunOptions};
use config::Config;
use pool::RunReport;
use report::SummaryPolicy;

#[tokio::main]
async fn main() {
    logging::init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            inputs,
            base_url,
            run,
        } => handle_check(&inputs, base_url.as_deref(), &run).await,
        Commands::Fetch {
            urls,
            file,
            output_dir,
            run,
        } => handle_fetch(urls, file, output_dir, &run).await,
    }
}

// Handles the 'check' subcommand
async fn handle_check(inputs: &[String], base_url: Option<&str>, args: &RunArgs) -> Result<i32> {
    let (config, options) = resolve_config(args)?;
    let client = LinkClient::new(&config.client_settings()).context("failed to build HTTP client")?;

    let references = sources::load_references(inputs, base_url)?;
    if options.verbose && !args.json {
        println!(
            "Checking {} reference(s) with {} worker(s)...\n",
            references.len(),
            options.workers
        );
    }

    let report = checker::check_references(&client, references, &options, interrupted()).await;
    finish(&report, SummaryPolicy::Probe, args.json)
}

// Handles the 'fetch' subcommand
async fn handle_fetch(
    mut urls: Vec<String>,
    file: Option<PathBuf>,
    output_dir: PathBuf,
    args: &RunArgs,
) -> Result<i32> {
    let (config, options) = resolve_config(args)?;
    let client = LinkClient::new(&config.client_settings()).context("failed to build HTTP client")?;

    if let Some(file) = file {
        urls.extend(sources::load_url_list(&file)?);
    }

    let report =
        checker::download_urls(&client, urls, &output_dir, &options, interrupted()).await?;
    finish(&report, SummaryPolicy::Fetch, args.json)
}

// Merges the config file with command-line overrides
fn resolve_config(args: &RunArgs) -> Result<(Config, RunOptions)> {
    let mut config = config::load(args.config.as_deref())?;

    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.quiet || args.json {
        config.verbose = false;
    }
    if args.strict_tls {
        config.accept_invalid_certs = false;
    }

    let options = RunOptions {
        workers: config.workers,
        verbose: config.verbose,
        progress: report::stdout_sink(),
    };
    Ok((config, options))
}

// Resolves on Ctrl-C. If the signal handler cannot be installed, never resolves.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// Prints the summary and picks the exit code
fn finish(report: &RunReport, policy: SummaryPolicy, json: bool) -> Result<i32> {
    if json {
        report::print_json(report, policy)?;
    } else {
        report::print_summary(report, policy);
    }

    let totals = report::totals(&report.snapshot, policy);
    if totals.broken > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn args(config: &std::path::Path) -> RunArgs {
        RunArgs {
            workers: None,
            quiet: false,
            json: false,
            strict_tls: false,
            config: Some(config.to_path_buf()),
        }
    }

    #[test]
    fn test_resolve_config_uses_file_without_flags() {
        let file = config_file("workers = 3\nverbose = true\n");
        let (config, options) = resolve_config(&args(file.path())).unwrap();

        assert_eq!(config.workers, 3);
        assert_eq!(options.workers, 3);
        assert!(options.verbose);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_resolve_config_workers_and_quiet_override_file() {
        let file = config_file("workers = 3\nverbose = true\n");
        let mut run = args(file.path());
        run.workers = Some(8);
        run.quiet = true;

        let (config, options) = resolve_config(&run).unwrap();
        assert_eq!(config.workers, 8);
        assert_eq!(options.workers, 8);
        assert!(!options.verbose);
    }

    #[test]
    fn test_resolve_config_json_silences_progress() {
        let file = config_file("verbose = true\n");
        let mut run = args(file.path());
        run.json = true;

        let (_, options) = resolve_config(&run).unwrap();
        assert!(!options.verbose);
    }

    #[test]
    fn test_resolve_config_strict_tls_overrides_file() {
        let file = config_file("accept_invalid_certs = true\n");
        let mut run = args(file.path());
        run.strict_tls = true;

        let (config, _) = resolve_config(&run).unwrap();
        assert!(!config.client_settings().accept_invalid_certs);
    }
}
