//! Tracing/logging initialization.
//!
//! One JSON line per event, filtered through `RUST_LOG` with an `info`
//! default. The ledger engine emits commit and retry events through the
//! `tracing` macros; embedders call [`init`] once at startup to surface them.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_is_a_no_op() {
        super::init();
        super::init();
    }
}
