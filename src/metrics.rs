use tracing::trace;

// Trace-level counters; a metrics recorder can subscribe to these targets
// without the pipeline linking a metrics backend.

pub fn backend_attempt(backend: &str, outcome: &'static str) {
    trace!(
        target = "copyforge.metrics",
        backend = backend,
        outcome = outcome,
        "backend_attempt"
    );
}

pub fn pipeline_completed(source: &str, elapsed_ms: u128) {
    trace!(
        target = "copyforge.metrics",
        source = source,
        elapsed_ms = elapsed_ms as u64,
        "pipeline_completed"
    );
}
