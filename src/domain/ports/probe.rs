use thiserror::Error;

use crate::domain::entities::snapshot::ResourceSnapshot;

#[derive(Error, Debug)]
pub enum ProbeError {
    /// The host does not report resource usage. Expected on some hosts;
    /// the sampler treats it as a silent no-op, never a fault.
    #[error("host does not report resource usage")]
    Unsupported,
    #[error("failed to read resource usage: {0}")]
    ReadFailed(String),
}

pub trait UsageProbe: Send + Sync {
    /// Take a point-in-time resource usage reading.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Unsupported` when the host cannot report usage,
    /// or `ProbeError::ReadFailed` when the reading fails.
    fn sample(&self) -> Result<ResourceSnapshot, ProbeError>;
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_display() {
        let err = ProbeError::Unsupported;
        assert_eq!(err.to_string(), "host does not report resource usage");

        let err = ProbeError::ReadFailed("lock poisoned".to_string());
        assert_eq!(err.to_string(), "failed to read resource usage: lock poisoned");
    }
}
