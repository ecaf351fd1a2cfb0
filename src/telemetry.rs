//! Tracing bootstrap for binaries embedding the engine.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
///
/// Call once at process start; calling twice is a no-op (the second install
/// fails quietly rather than panicking inside a library).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
