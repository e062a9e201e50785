// src/checker/run.rs
// =============================================================================
// The two entry points: check a list of references, or download a list of
// URLs. Both build a WorkerPool around the shared LinkClient, submit every
// item, and wait for the pool to drain (or for the interrupt to fire).
//
// Per-task console lines go to the RunOptions sink from inside the workers as
// results come in, unless the caller turned verbose output off. The final
// summary is never routed through here.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::http::LinkClient;
use super::outcome::Outcome;
use crate::pool::{RunReport, WorkerPool};
use crate::report::{LineSink, SummaryPolicy, Tone};
use crate::sources::Reference;

#[derive(Clone)]
pub struct RunOptions {
    /// Number of concurrent workers
    pub workers: usize,
    /// Emit one line per finished task
    pub verbose: bool,
    /// Receives the per-task lines
    pub progress: LineSink,
}

// Checks every reference and groups them by outcome
//
// Prints "<category> - <target>" per reference while running (green for
// 2xx/3xx, red for the rest).
pub async fn check_references<F>(
    client: &LinkClient,
    references: Vec<Reference>,
    options: &RunOptions,
    interrupt: F,
) -> RunReport
where
    F: Future<Output = ()>,
{
    let client = client.clone();
    let verbose = options.verbose;
    let progress = Arc::clone(&options.progress);

    let mut pool = WorkerPool::new(options.workers, move |reference: Reference| {
        let client = client.clone();
        let progress = Arc::clone(&progress);
        async move {
            let outcome = client.probe(&reference.target).await;
            if verbose {
                let category = outcome.category_key();
                let tone = if SummaryPolicy::Probe.is_working(&category) {
                    Tone::Ok
                } else {
                    Tone::Fail
                };
                progress(tone, &format!("{} - {}", category, reference.target));
            }
            outcome
        }
    });

    pool.submit_all(references);
    pool.await_completion_or(interrupt).await
}

// Downloads every URL into `output_dir`
//
// The directory is created first if it does not exist. Failing to create it
// is the only error returned; per-URL failures end up in the report.
pub async fn download_urls<F>(
    client: &LinkClient,
    urls: Vec<String>,
    output_dir: &Path,
    options: &RunOptions,
    interrupt: F,
) -> Result<RunReport>
where
    F: Future<Output = ()>,
{
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        if options.verbose {
            (options.progress)(
                Tone::Plain,
                &format!("Created directory '{}'", output_dir.display()),
            );
        }
    }

    let client = client.clone();
    let verbose = options.verbose;
    let progress = Arc::clone(&options.progress);
    let output_dir: Arc<PathBuf> = Arc::new(output_dir.to_path_buf());
    // Paths written so far this run; two URLs can share a last segment
    let written: Arc<Mutex<HashSet<PathBuf>>> = Arc::default();

    let mut pool = WorkerPool::new(options.workers, move |reference: Reference| {
        let client = client.clone();
        let progress = Arc::clone(&progress);
        let output_dir = Arc::clone(&output_dir);
        let written = Arc::clone(&written);
        async move {
            let url = reference.target;
            match client.download(&url, &output_dir).await {
                Ok(download) => {
                    tracing::debug!(url = %url, bytes = download.bytes, "downloaded");
                    let first_write = written
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(download.path.clone());
                    if !first_write {
                        tracing::warn!(
                            url = %url,
                            path = %download.path.display(),
                            "overwrote a file downloaded earlier in this run"
                        );
                    }
                    if verbose {
                        progress(
                            Tone::Ok,
                            &format!("Downloaded '{}' to '{}'", url, download.path.display()),
                        );
                        if !first_write {
                            progress(
                                Tone::Fail,
                                &format!(
                                    "Warning: '{}' overwrote '{}'",
                                    url,
                                    download.path.display()
                                ),
                            );
                        }
                    }
                    Outcome::from_status(download.status)
                }
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "download failed");
                    if verbose {
                        progress(Tone::Fail, &format!("Error downloading '{}' ({})", url, e));
                    }
                    e.outcome()
                }
            }
        }
    });

    pool.submit_all(urls.into_iter().map(|url| Reference::new(url, 0)));
    Ok(pool.await_completion_or(interrupt).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::http::ClientSettings;
    use crate::report::{render_text, totals, Totals};
    use httpmock::{Method::GET, MockServer};
    use std::future::pending;

    // Sink that keeps every per-task line for inspection
    fn capture() -> (LineSink, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        let sink: LineSink = Arc::new(move |_tone: Tone, text: &str| {
            sink_lines.lock().unwrap().push(text.to_string());
        });
        (sink, lines)
    }

    fn options(verbose: bool) -> (RunOptions, Arc<Mutex<Vec<String>>>) {
        let (progress, lines) = capture();
        let options = RunOptions {
            workers: 5,
            verbose,
            progress,
        };
        (options, lines)
    }

    fn quiet() -> RunOptions {
        options(false).0
    }

    #[tokio::test]
    async fn test_check_references_groups_outcomes() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ok");
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let references = vec![
            Reference::new(server.url("/ok"), 1),
            Reference::new(server.url("/missing"), 7),
            Reference::new(server.url("/ok"), 9),
        ];
        let report = check_references(&client, references, &quiet(), pending()).await;

        assert_eq!(report.recorded, 3);
        assert_eq!(report.snapshot["200"].len(), 2);
        assert_eq!(
            report.snapshot["404"],
            vec![Reference::new(server.url("/missing"), 7)]
        );
        assert_eq!(
            totals(&report.snapshot, SummaryPolicy::Probe),
            Totals { working: 2, broken: 1 }
        );
    }

    #[tokio::test]
    async fn test_check_nothing() {
        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let report = check_references(&client, Vec::new(), &quiet(), pending()).await;

        assert_eq!(report.submitted, 0);
        assert_eq!(
            render_text(&report.snapshot, SummaryPolicy::Probe),
            "Summary of link checker:\n0 working"
        );
    }

    #[tokio::test]
    async fn test_download_one_ok_one_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/a.txt");
                then.status(200).body("A");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/b.txt");
                then.status(404).body("not here");
            })
            .await;

        let root = tempfile::tempdir().unwrap();
        let output_dir = root.path().join("downloads");
        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let urls = vec![server.url("/files/a.txt"), server.url("/files/b.txt")];

        let report = download_urls(&client, urls, &output_dir, &quiet(), pending())
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files, vec![output_dir.join("a.txt")]);
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "A");

        assert_eq!(
            totals(&report.snapshot, SummaryPolicy::Fetch),
            Totals { working: 1, broken: 1 }
        );
        assert_eq!(
            report.snapshot["404"],
            vec![Reference::new(server.url("/files/b.txt"), 0)]
        );
    }

    #[tokio::test]
    async fn test_verbose_run_emits_one_line_per_task() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ok");
                then.status(200);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let (options, lines) = options(true);
        let references = vec![
            Reference::new(server.url("/ok"), 1),
            Reference::new(server.url("/missing"), 2),
        ];
        check_references(&client, references, &options, pending()).await;

        let mut lines = lines.lock().unwrap().clone();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                format!("200 - {}", server.url("/ok")),
                format!("404 - {}", server.url("/missing")),
            ]
        );
    }

    #[tokio::test]
    async fn test_quiet_run_emits_no_task_lines_but_keeps_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let (options, lines) = options(false);
        let references = vec![Reference::new(server.url("/missing"), 4)];
        let report = check_references(&client, references, &options, pending()).await;

        assert!(lines.lock().unwrap().is_empty());
        let summary = render_text(&report.snapshot, SummaryPolicy::Probe);
        assert!(summary.starts_with("Summary of link checker:"));
        assert!(summary.contains("1 broken"));
    }

    #[tokio::test]
    async fn test_download_warns_when_two_urls_share_a_file_name() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/x/f.bin");
                then.status(200).body("one");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/y/f.bin");
                then.status(200).body("two");
            })
            .await;

        let root = tempfile::tempdir().unwrap();
        let client = LinkClient::new(&ClientSettings::default()).unwrap();
        let (options, lines) = options(true);
        let urls = vec![server.url("/x/f.bin"), server.url("/y/f.bin")];

        let report = download_urls(&client, urls, root.path(), &options, pending())
            .await
            .unwrap();

        let files: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(report.snapshot["200"].len(), 2);

        let overwrites = lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains("overwrote"))
            .count();
        assert_eq!(overwrites, 1);
    }
}
