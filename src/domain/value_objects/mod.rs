pub mod health;
pub mod level;
pub mod thresholds;
pub mod trend;

pub use health::HealthLevel;
pub use level::AlertLevel;
pub use thresholds::{AlertThresholds, Band, ChannelThresholds, HealthBands};
pub use trend::Trend;
