//! Tracing initialization for the CLI.
//!
//! Library code only emits events; installing a subscriber is the binary's job.

/// Initialize tracing to stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stdout stays reserved for the JSON verdict. Safe to call twice: the second
/// call is ignored.
pub fn init_stderr_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .try_init();
}
