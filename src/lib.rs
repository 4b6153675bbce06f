//! Runtime performance-observability and self-remediation engine.
//!
//! `vitals` continuously samples resource usage, raises threshold-based
//! alerts with cooldown suppression, infers trend direction from sliding
//! windows, classifies overall health, and triggers a mutually-exclusive
//! cascade of remediation actions when conditions turn critical.
//!
//! Hosts interact through the [`engine::PerfMonitor`] facade; host-specific
//! cache eviction is plugged in via the
//! [`domain::ports::reclaimer::ResourceReclaimer`] port.

pub mod application;
pub mod domain;
pub mod engine;
pub mod infrastructure;

pub use engine::PerfMonitor;
