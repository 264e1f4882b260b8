use std::cell::OnceCell;

use cpuonline_sysfs::{CoreId, CpuDevices};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::hotplug::CoreSet;

/// Discovers the cores of a device directory and caches the result.
///
/// The cache lives as long as the enumerator; it is never invalidated, so
/// cores plugged in mid-run are not seen.
#[derive(Debug)]
pub struct CoreEnumerator<D> {
    devices: D,
    cores: OnceCell<CoreSet>,
}

impl<D: CpuDevices> CoreEnumerator<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            cores: OnceCell::new(),
        }
    }

    pub fn devices(&self) -> &D {
        &self.devices
    }

    /// Returns the discovered cores in listing order, listing the directory
    /// on first use only. A failed listing is not cached.
    pub fn discover_cores(&self) -> Result<&CoreSet> {
        if let Some(cores) = self.cores.get() {
            return Ok(cores);
        }
        let cores = self.scan()?;
        Ok(self.cores.get_or_init(|| cores))
    }

    pub fn is_valid_core(&self, core: CoreId) -> Result<bool> {
        Ok(self.discover_cores()?.contains(core))
    }

    fn scan(&self) -> Result<CoreSet> {
        let root = self.devices.root();
        let entries = self
            .devices
            .list_entries()
            .map_err(|source| CoreError::Discovery {
                root: root.to_path_buf(),
                source,
            })?;
        let cores: CoreSet = entries
            .iter()
            .filter_map(|name| CoreId::from_entry_name(name))
            .collect();
        debug!(root = %root.display(), entries = entries.len(), cores = cores.len(), "discovered CPU cores");
        Ok(cores)
    }
}
