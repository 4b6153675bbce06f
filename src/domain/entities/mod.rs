pub mod alert;
pub mod metric;
pub mod snapshot;
pub mod stats;

pub use alert::Alert;
pub use metric::{MetricRecord, MetricUnit};
pub use snapshot::ResourceSnapshot;
pub use stats::{AggregateStats, MemoryReport, OperationStats};
