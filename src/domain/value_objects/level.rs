use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Severity of an emitted alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl AlertLevel {
    /// Colored label for terminal output.
    #[must_use]
    pub fn colored_label(self) -> colored::ColoredString {
        match self {
            Self::Warning => "WARNING".yellow().bold(),
            Self::Critical => "CRITICAL".red().bold(),
        }
    }
}
