//! Process-wide observability setup (tracing/logging).

/// Tracing configuration (filter, output format).
pub mod tracing;

/// Initialize process-wide observability for an embedding binary.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
