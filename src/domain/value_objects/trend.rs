use serde::{Deserialize, Serialize};

/// Direction of resource usage over the sliding comparison window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// Not enough history to compare two full windows
    #[default]
    Unknown,
    Stable,
    Increasing,
    Decreasing,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Stable => write!(f, "stable"),
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
        }
    }
}
