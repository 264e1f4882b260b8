//! cpuonline core - CPU hotplug control over sysfs.
//!
//! This crate provides:
//! - Core discovery with a per-run cache
//! - Online/offline status reads and writes
//! - The `cpuonline` command-line surface and its dispatcher
//! - Logging and configuration for the binary

pub mod cli;
pub mod config;
pub mod error;
pub mod hotplug;
pub mod logging;

pub use cpuonline_sysfs::{CoreId, CpuDevices, InMemoryCpuDevices, SysfsCpuDevices};
pub use error::{CoreError, ErrorKind, Result};
pub use hotplug::{CoreControl, CoreSelection, CoreSet, CoreStatus};
