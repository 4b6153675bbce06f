pub mod probe;
pub mod reclaimer;

pub use probe::{ProbeError, UsageProbe};
pub use reclaimer::{
    AllocatorHint, ReclaimError, ReclaimPressure, ReclaimReport, ResourceReclaimer,
};
