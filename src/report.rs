// src/report.rs
// =============================================================================
// Turns a finished run into the summary printed at the end.
//
// Two policies decide what counts as "working":
// - Probe (link checking): any category starting with '2' or '3'
// - Fetch (downloading):   only "200" and "302", the statuses we write
//
// Working categories are only counted. Every other category is listed with
// its references. The snapshot is already sorted (keys lexicographically,
// references by submission), so the same snapshot always renders the same
// text no matter what order tasks finished in.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::pool::{RunReport, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPolicy {
    Probe,
    Fetch,
}

impl SummaryPolicy {
    pub fn is_working(&self, category: &str) -> bool {
        match self {
            SummaryPolicy::Probe => category.starts_with('2') || category.starts_with('3'),
            SummaryPolicy::Fetch => category == "200" || category == "302",
        }
    }

    fn header(&self) -> &'static str {
        match self {
            SummaryPolicy::Probe => "Summary of link checker:",
            SummaryPolicy::Fetch => "Summary of downloads:",
        }
    }

    fn broken_word(&self) -> &'static str {
        match self {
            SummaryPolicy::Probe => "broken",
            SummaryPolicy::Fetch => "failed",
        }
    }

    fn working_word(&self) -> &'static str {
        match self {
            SummaryPolicy::Probe => "working",
            SummaryPolicy::Fetch => "downloaded",
        }
    }
}

/// Color cue for one console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Fail,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub tone: Tone,
    pub text: String,
}

impl SummaryLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub working: usize,
    pub broken: usize,
}

pub fn totals(snapshot: &Snapshot, policy: SummaryPolicy) -> Totals {
    let mut totals = Totals::default();
    for (category, refs) in snapshot {
        if policy.is_working(category) {
            totals.working += refs.len();
        } else {
            totals.broken += refs.len();
        }
    }
    totals
}

// Builds the summary block
//
// Example (probe):
//   Summary of link checker:
//   1 broken (reason: 404)
//     - http://example.com/missing (at 12)
//   3 working
pub fn render(snapshot: &Snapshot, policy: SummaryPolicy) -> Vec<SummaryLine> {
    let mut lines = vec![SummaryLine::new(Tone::Plain, policy.header())];
    let mut working = 0;

    for (category, refs) in snapshot {
        if policy.is_working(category) {
            working += refs.len();
            continue;
        }

        lines.push(SummaryLine::new(
            Tone::Fail,
            format!("{} {} (reason: {})", refs.len(), policy.broken_word(), category),
        ));
        for reference in refs {
            let mut line = format!("  - {}", reference.target);
            if reference.origin > 0 {
                line.push_str(&format!(" (at {})", reference.origin));
            }
            lines.push(SummaryLine::new(Tone::Plain, line));
        }
    }

    lines.push(SummaryLine::new(
        Tone::Ok,
        format!("{} {}", working, policy.working_word()),
    ));
    lines
}

/// The summary as plain text, one line per entry
pub fn render_text(snapshot: &Snapshot, policy: SummaryPolicy) -> String {
    render(snapshot, policy)
        .into_iter()
        .map(|line| line.text)
        .collect::<Vec<_>>()
        .join("\n")
}

// Prints one line with its color cue
//
// console::style only emits ANSI codes when stdout is a color terminal,
// so piped output stays plain text.
pub fn print_line(tone: Tone, text: &str) {
    match tone {
        Tone::Ok => println!("{}", console::style(text).green()),
        Tone::Fail => println!("{}", console::style(text).red()),
        Tone::Plain => println!("{}", text),
    }
}

/// Where per-task progress lines go while a run is in flight
pub type LineSink = Arc<dyn Fn(Tone, &str) + Send + Sync>;

/// Progress lines straight to the terminal
pub fn stdout_sink() -> LineSink {
    Arc::new(print_line)
}

pub fn print_summary(report: &RunReport, policy: SummaryPolicy) {
    println!();
    if report.cancelled {
        print_line(Tone::Fail, "Interrupted: reporting partial results");
    }
    for line in render(&report.snapshot, policy) {
        print_line(line.tone, &line.text);
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    totals: Totals,
    submitted: usize,
    recorded: usize,
    cancelled: bool,
    categories: &'a Snapshot,
}

pub fn print_json(report: &RunReport, policy: SummaryPolicy) -> Result<()> {
    let json = JsonReport {
        totals: totals(&report.snapshot, policy),
        submitted: report.submitted,
        recorded: report.recorded,
        cancelled: report.cancelled,
        categories: &report.snapshot,
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
