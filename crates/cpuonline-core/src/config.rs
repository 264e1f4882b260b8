use std::path::PathBuf;

use cpuonline_sysfs::{DEFAULT_CPU_DEVICE_DIR, SysfsCpuDevices};

use crate::cli::Cli;

pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const SYSFS_ROOT_ENV: &str = "CPUONLINE_SYSFS_ROOT";
pub const LOG_LEVEL_ENV: &str = "CPUONLINE_LOG";

/// Settings for one run. Flags win over environment variables, which win over
/// the defaults; the precedence itself is handled by clap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sysfs_root: PathBuf,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_CPU_DEVICE_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            sysfs_root: cli.sysfs_root.clone(),
            log_level: cli.log_level.clone(),
        }
    }

    pub fn devices(&self) -> SysfsCpuDevices {
        SysfsCpuDevices::new(&self.sysfs_root)
    }
}
