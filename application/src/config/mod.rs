//! Application-level configuration.
//!
//! - [`SchedulerConfig`] - turn scheduler behaviour (per-turn timeout)

pub mod scheduler_config;

pub use scheduler_config::SchedulerConfig;
