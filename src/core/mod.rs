// Core sampling and delivery logic

pub mod batch;
pub mod config;
pub mod orchestrator;
pub mod sampler;
pub mod trigger;

// Re-export commonly used items
pub use batch::{DeliveryRequest, HostMeta, MetricReading, SampleBatch};
pub use config::Config;
pub use orchestrator::Orchestrator;
pub use sampler::{run_cycle, CycleOutcome};
pub use trigger::{DeliveryTrigger, TriggerKind};
