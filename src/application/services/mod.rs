pub mod health_check;
pub mod remediation;
pub mod sampler;

pub use health_check::{HealthCheck, HealthCheckPipeline};
pub use remediation::{RemediationOrchestrator, RemediationOutcome, RemediationStats};
pub use sampler::{Sampler, SamplerPipeline};
