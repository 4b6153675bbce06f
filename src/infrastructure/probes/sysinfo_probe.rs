use std::sync::Mutex;

use sysinfo::System;

use crate::domain::entities::snapshot::ResourceSnapshot;
use crate::domain::ports::probe::{ProbeError, UsageProbe};

/// Samples process-host memory usage via the `sysinfo` crate.
///
/// Uses `Mutex<System>` for interior mutability since the `UsageProbe`
/// trait takes `&self` but `sysinfo::System` needs `&mut self` to refresh.
pub struct SysinfoProbe {
    sys: Mutex<System>,
}

impl SysinfoProbe {
    /// Creates a probe with pre-initialized memory data.
    #[must_use]
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        Self {
            sys: Mutex::new(sys),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageProbe for SysinfoProbe {
    fn sample(&self) -> Result<ResourceSnapshot, ProbeError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| ProbeError::ReadFailed(format!("system lock poisoned: {e}")))?;
        sys.refresh_memory();

        let total = sys.total_memory();
        let used = sys.used_memory();
        drop(sys);

        if total == 0 {
            return Err(ProbeError::Unsupported);
        }
        Ok(ResourceSnapshot::new(used, total))
    }
}
