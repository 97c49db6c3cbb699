//! Tracing subscriber setup for the binary.
//!
//! The filter comes from `DICTSCOPE_LOG`, falling back to `RUST_LOG`. Without
//! either, only warnings are shown, or everything down to `debug` with
//! `--verbose`.
//!
//! All output goes to stderr so it never mixes with `--json` output or the
//! MCP stdio transport.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "DICTSCOPE_LOG";

fn build_filter(verbose: bool) -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV_VAR) {
        return EnvFilter::builder().parse_lossy(val);
    }
    if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(if verbose { "dictscope=debug" } else { "warn" })
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
