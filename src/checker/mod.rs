// src/checker/mod.rs
// =============================================================================
// This module contains everything that talks to the network for one task.
//
// Submodules:
// - normalize: turns DOIs and bare hosts into fetchable URLs
// - outcome: the classified result of a request
// - http: the shared reqwest client and probe()
// - fetch: download() for fetch mode
// - run: wires the client into the worker pool for `check` and `fetch`
// =============================================================================

mod fetch;
mod http;
mod normalize;
mod outcome;
mod run;

pub use http::{ClientSettings, LinkClient, DEFAULT_USER_AGENT};
pub use outcome::{NetworkErrorKind, Outcome};
pub use run::{check_references, download_urls, RunOptions};
