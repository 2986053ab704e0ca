//! Flow module - multi-agent orchestration

pub mod orchestrator;

pub use orchestrator::Flow;
