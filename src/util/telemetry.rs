//! Tracing subscriber bootstrap for binaries and test harnesses.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "specfall=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Install the process-global tracing subscriber.
///
/// Honours `RUST_LOG` when set, otherwise falls back to crate-level info
/// output. Calling it repeatedly is a no-op. The library itself never calls
/// this; hosts that already own a subscriber keep theirs.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        if let Err(err) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
        {
            eprintln!("[telemetry] tracing subscriber not installed: {err}");
        }
    });
}
