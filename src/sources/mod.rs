// src/sources/mod.rs
// =============================================================================
// This module turns command-line inputs into References to check.
//
// An input is either a file or a raw target:
// - *.md / *.markdown  -> links extracted with pulldown-cmark (origin = line)
// - *.html / *.htm     -> <a href> links extracted with scraper
// - any other file     -> a plain reference list (see list.rs)
// - not a file         -> the string itself, e.g. "example.com" or a DOI
// =============================================================================

mod html;
mod list;
mod markdown;

pub use html::extract_html_links;
pub use list::parse_reference_list;
pub use markdown::extract_markdown_links;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// One thing to check: a target URL (or DOI) plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub target: String,
    /// Line or page the reference came from, 0 when unknown
    #[serde(skip_serializing_if = "is_zero")]
    pub origin: u32,
}

impl Reference {
    pub fn new(target: impl Into<String>, origin: u32) -> Self {
        Self {
            target: target.into(),
            origin,
        }
    }
}

fn is_zero(origin: &u32) -> bool {
    *origin == 0
}

// Resolves every input into references, in input order
pub fn load_references(inputs: &[String], base_url: Option<&str>) -> Result<Vec<Reference>> {
    let mut references = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if !path.is_file() {
            references.push(Reference::new(input.as_str(), 0));
            continue;
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let found = match extension_of(path).as_deref() {
            Some("md") | Some("markdown") => extract_markdown_links(&text),
            Some("html") | Some("htm") => extract_html_links(&text, base_url),
            _ => parse_reference_list(&text),
        };

        tracing::info!(file = %path.display(), count = found.len(), "loaded references");
        references.extend(found);
    }

    Ok(references)
}

// Reads a plain URL list for the fetch command (origins are dropped)
pub fn load_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_reference_list(&text)
        .into_iter()
        .map(|r| r.target)
        .collect())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
