pub mod aggregate;
pub mod classify;
pub mod trend;
