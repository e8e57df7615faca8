//! Configurable validator host

use std::fmt;
use std::sync::Arc;

use super::observer::{NoopObserver, RutObserver, TracingObserver};
use super::{Rut, RutError, normalize, parse_normalized};

/// Validation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RutConfig {
    /// Emit `tracing` debug events for every call
    pub trace: bool,
    /// Reject unexpected characters instead of stripping them
    pub strict: bool,
}

impl RutConfig {
    /// Lenient, silent
    pub const fn lenient() -> Self {
        Self {
            trace: false,
            strict: false,
        }
    }

    pub const fn strict() -> Self {
        Self {
            trace: false,
            strict: true,
        }
    }

    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// RUT validator with explicit configuration and an observer port
///
/// Cheap to clone; share one instance per process through the crate configs.
#[derive(Clone)]
pub struct RutValidator {
    config: RutConfig,
    observer: Arc<dyn RutObserver>,
}

impl RutValidator {
    /// Build from config; `trace` selects [`TracingObserver`]
    pub fn new(config: RutConfig) -> Self {
        let observer: Arc<dyn RutObserver> = if config.trace {
            Arc::new(TracingObserver)
        } else {
            Arc::new(NoopObserver)
        };
        Self { config, observer }
    }

    /// Replace the observer (tests, custom diagnostics)
    pub fn with_observer(mut self, observer: Arc<dyn RutObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> RutConfig {
        self.config
    }

    /// Validate and canonicalize a raw RUT
    pub fn validate(&self, raw: &str) -> Result<Rut, RutError> {
        if self.config.strict {
            if let Some(bad) = raw.chars().find(|c| !is_allowed_in_strict(*c)) {
                let outcome = Err(RutError::InvalidCharacter(bad));
                self.observer.on_outcome(&normalize(raw), &outcome);
                return outcome;
            }
        }

        let cleaned = normalize(raw);
        self.observer.on_normalized(raw, &cleaned);

        let outcome = parse_normalized(&cleaned);
        self.observer.on_outcome(&cleaned, &outcome);
        outcome
    }
}

impl Default for RutValidator {
    fn default() -> Self {
        Self::new(RutConfig::default())
    }
}

impl fmt::Debug for RutValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RutValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn is_allowed_in_strict(c: char) -> bool {
    c.is_ascii_digit() || c == 'k' || c == 'K' || c == '.' || c == '-' || c.is_whitespace()
}
