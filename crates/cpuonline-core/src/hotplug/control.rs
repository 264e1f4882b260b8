use cpuonline_sysfs::{CoreId, CpuDevices};

use crate::error::Result;
use crate::hotplug::{
    CoreEnumerator, CoreSelection, CoreStatus, StatusReader, StatusReport, StatusWriter,
};

/// One run's view of the device directory: discovery happens at most once
/// for the lifetime of the session.
#[derive(Debug)]
pub struct CoreControl<D> {
    enumerator: CoreEnumerator<D>,
}

impl<D: CpuDevices> CoreControl<D> {
    pub fn new(devices: D) -> Self {
        Self {
            enumerator: CoreEnumerator::new(devices),
        }
    }

    pub fn enumerator(&self) -> &CoreEnumerator<D> {
        &self.enumerator
    }

    pub fn reader(&self) -> StatusReader<'_, D> {
        StatusReader::new(self.enumerator.devices())
    }

    pub fn writer(&self) -> StatusWriter<'_, D> {
        StatusWriter::new(&self.enumerator)
    }

    /// Reports every discovered core in discovery order.
    pub fn report_all(
        &self,
    ) -> Result<StatusReport<'_, D, std::iter::Copied<std::slice::Iter<'_, CoreId>>>> {
        let cores = self.enumerator.discover_cores()?;
        Ok(self.reader().report(cores.as_slice().iter().copied()))
    }

    /// Collects [`report_all`](Self::report_all), failing on the first error.
    pub fn status(&self) -> Result<Vec<(CoreId, CoreStatus)>> {
        self.report_all()?.collect()
    }

    /// Applies `target` to `selection` and returns the full status afterwards.
    pub fn switch(
        &self,
        target: CoreStatus,
        selection: &CoreSelection,
    ) -> Result<Vec<(CoreId, CoreStatus)>> {
        self.writer().apply(target, selection)?;
        self.status()
    }
}
