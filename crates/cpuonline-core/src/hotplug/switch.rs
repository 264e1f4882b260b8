use cpuonline_sysfs::{CoreId, CpuDevices};
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::hotplug::{CoreEnumerator, CoreSelection, CoreStatus};

/// Validates cores against discovery and writes their `online` attribute.
#[derive(Debug)]
pub struct StatusWriter<'a, D> {
    enumerator: &'a CoreEnumerator<D>,
}

impl<'a, D: CpuDevices> StatusWriter<'a, D> {
    pub fn new(enumerator: &'a CoreEnumerator<D>) -> Self {
        Self { enumerator }
    }

    /// Expands a selection into the cores it names.
    pub fn resolve(&self, selection: &CoreSelection) -> Result<Vec<CoreId>> {
        match selection {
            CoreSelection::All => Ok(self.enumerator.discover_cores()?.as_slice().to_vec()),
            CoreSelection::Specific(cores) => Ok(cores.clone()),
        }
    }

    /// Sets every core in `cores` to `target`, in order.
    ///
    /// Each core is validated right before its write, so a bad id stops the
    /// batch but leaves earlier cores switched. The primary core is skipped.
    /// Writes happen even when the core already has the target status.
    pub fn set_status(&self, target: CoreStatus, cores: &[CoreId]) -> Result<()> {
        for &core in cores {
            if !self.enumerator.is_valid_core(core)? {
                return Err(CoreError::InvalidCore(core));
            }
            if core.is_primary() {
                debug!(core = core.get(), "skipping primary CPU");
                continue;
            }
            self.enumerator
                .devices()
                .write_online(core, target.as_sysfs_value())
                .map_err(|source| CoreError::WriteStatus {
                    core,
                    target,
                    source,
                })?;
            info!(core = core.get(), status = %target, "changed CPU status");
        }
        Ok(())
    }

    /// Resolves `selection` and applies `target` to it. Returns the cores
    /// that were targeted.
    pub fn apply(&self, target: CoreStatus, selection: &CoreSelection) -> Result<Vec<CoreId>> {
        let cores = self.resolve(selection)?;
        self.set_status(target, &cores)?;
        Ok(cores)
    }
}
