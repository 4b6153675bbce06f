pub mod history;
pub mod metric_store;
pub mod probes;
pub mod registry;
