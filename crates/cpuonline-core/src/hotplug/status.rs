use cpuonline_sysfs::{CoreId, CpuDevices};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::hotplug::CoreStatus;

/// Reads the `online` attribute of cores.
#[derive(Debug)]
pub struct StatusReader<'a, D> {
    devices: &'a D,
}

impl<'a, D: CpuDevices> StatusReader<'a, D> {
    pub fn new(devices: &'a D) -> Self {
        Self { devices }
    }

    /// The primary core is online without touching the device directory.
    pub fn read_status(&self, core: CoreId) -> Result<CoreStatus> {
        if core.is_primary() {
            return Ok(CoreStatus::Online);
        }
        let content = self
            .devices
            .read_online(core)
            .map_err(|source| CoreError::ReadStatus { core, source })?;
        let value = content
            .trim()
            .parse::<i8>()
            .map_err(|source| CoreError::ParseStatus {
                core,
                content: content.trim().to_string(),
                source,
            })?;
        debug!(core = core.get(), value, "read CPU status");
        Ok(CoreStatus::from_online(value != 0))
    }

    /// Lazily reads every core in `cores`, stopping after the first failure.
    pub fn report<I>(&self, cores: I) -> StatusReport<'a, D, I::IntoIter>
    where
        I: IntoIterator<Item = CoreId>,
    {
        StatusReport {
            reader: StatusReader {
                devices: self.devices,
            },
            cores: cores.into_iter(),
            failed: false,
        }
    }
}

/// Iterator returned by [`StatusReader::report`].
#[derive(Debug)]
pub struct StatusReport<'a, D, I> {
    reader: StatusReader<'a, D>,
    cores: I,
    failed: bool,
}

impl<D, I> Iterator for StatusReport<'_, D, I>
where
    D: CpuDevices,
    I: Iterator<Item = CoreId>,
{
    type Item = Result<(CoreId, CoreStatus)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let core = self.cores.next()?;
        match self.reader.read_status(core) {
            Ok(status) => Some(Ok((core, status))),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<D, I> std::iter::FusedIterator for StatusReport<'_, D, I>
where
    D: CpuDevices,
    I: std::iter::FusedIterator<Item = CoreId>,
{
}
