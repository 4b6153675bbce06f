pub mod fixed;
pub mod noop;
pub mod sysinfo_probe;

pub use fixed::FixedProbe;
pub use noop::NoopProbe;
pub use sysinfo_probe::SysinfoProbe;
