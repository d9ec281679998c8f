//! Reachability engine behind the Mojang / Minecraft status dashboard.
//!
//! A [`ServiceRegistry`] declares the endpoints, grouped into categories. A [`StatusEngine`]
//! probes all of them concurrently, classifies each as online or offline, and hands back an
//! immutable [`Snapshot`] with per-service outcomes, totals and the latest release id.
//!
//! Probing is reachability only: any HTTP answer counts as online, whatever its status code.
//! The accepted codes of a [`ProbeDescriptor`] are kept for export and documentation.

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod http_probe;
pub mod manifest;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use engine::{CycleStats, EngineSettings, Snapshot, StatusEngine};
pub use error::{Result, StatusError};
pub use http_probe::{ProbeOutcome, ProbeStatus};
pub use manifest::PlatformVersion;
pub use registry::{ProbeDescriptor, ServiceRegistry};
