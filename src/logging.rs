// src/logging.rs
// =============================================================================
// Diagnostic logging via tracing, written to stderr.
//
// Check results go to stdout with println!, so logs never mix into piped or
// --json output. Verbosity is controlled with RUST_LOG, e.g.
//   RUST_LOG=linkpool=debug linkpool check README.md
// =============================================================================

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,linkpool=info";

pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // try_init so a second call (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
