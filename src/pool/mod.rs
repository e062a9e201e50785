// src/pool/mod.rs
// =============================================================================
// The concurrent engine: a fixed worker pool plus the shared result map.
//
// Submodules:
// - worker: WorkerPool, the tasks that drain the queue
// - results: ResultMap, the mutex-guarded aggregation map
// =============================================================================

mod results;
mod worker;

pub use results::Snapshot;
pub use worker::{RunReport, WorkerPool, DEFAULT_WORKERS};
