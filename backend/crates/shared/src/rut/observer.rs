//! Validation observers
//!
//! The validator itself never writes anything. Hosts that want diagnostics
//! plug an observer into [`RutValidator`](super::RutValidator).

use super::{Rut, RutError};

/// Hook notified on every validation call
pub trait RutObserver: Send + Sync {
    /// Called with the raw input and its normalized form, before any check
    fn on_normalized(&self, _raw: &str, _cleaned: &str) {}

    /// Called with the final outcome
    fn on_outcome(&self, _cleaned: &str, _outcome: &Result<Rut, RutError>) {}
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RutObserver for NoopObserver {}

/// Observer that emits `tracing` debug events
///
/// Raw input is never logged, only the cleaned form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RutObserver for TracingObserver {
    fn on_normalized(&self, raw: &str, cleaned: &str) {
        tracing::debug!(
            raw_len = raw.len(),
            cleaned = %cleaned,
            "RUT normalized"
        );
    }

    fn on_outcome(&self, cleaned: &str, outcome: &Result<Rut, RutError>) {
        match outcome {
            Ok(rut) => tracing::debug!(rut = %rut, "RUT accepted"),
            Err(err) => tracing::debug!(cleaned = %cleaned, reason = err.code(), "RUT rejected"),
        }
    }
}
