use crate::domain::entities::snapshot::ResourceSnapshot;
use crate::domain::ports::probe::{ProbeError, UsageProbe};

/// Probe for hosts that do not report usage: every sample returns
/// `Unsupported`, turning sampler ticks into silent no-ops.
pub struct NoopProbe;

impl NoopProbe {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for NoopProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageProbe for NoopProbe {
    fn sample(&self) -> Result<ResourceSnapshot, ProbeError> {
        Err(ProbeError::Unsupported)
    }
}
