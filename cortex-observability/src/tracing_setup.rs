//! `tracing-subscriber` wiring, initialized once at process startup
//! (`SPEC_FULL.md` section 2: "`tracing-subscriber` (`env-filter` + `json`)
//! wired up once in `cortex-observability::init`"). Log *content* is not
//! contractual (spec section 1 Non-goals); the presence of structured
//! events at component boundaries is.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a global JSON subscriber filtered by `RUST_LOG` (default
/// `info`). Safe to call once per process; a second call is a no-op
/// other than the returned error, which callers may ignore.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().json().with_env_filter(filter).try_init();
}
