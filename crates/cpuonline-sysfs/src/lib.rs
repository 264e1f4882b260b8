//! cpuonline sysfs library.
//!
//! This crate provides the filesystem boundary for CPU hotplug: listing the CPU
//! device directory and reading/writing the per-core `online` attribute.
//!
//! Two sources are provided:
//! - [`SysfsCpuDevices`] over a real directory (normally `/sys/devices/system/cpu`)
//! - [`InMemoryCpuDevices`], an in-memory table with fault injection for tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_CPU_DEVICE_DIR: &str = "/sys/devices/system/cpu";

/// Name prefix of a core's entry in the CPU device directory.
pub const CORE_ENTRY_PREFIX: &str = "cpu";

/// Name of the per-core hotplug attribute.
pub const ONLINE_ATTRIBUTE: &str = "online";

/// Identifier of a CPU core as exposed by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(u16);

impl CoreId {
    /// The boot core. The kernel never lets it go offline.
    pub const PRIMARY: CoreId = CoreId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }

    /// Parses a device directory entry name such as `cpu12`.
    ///
    /// Returns `None` for entries that are not cores (`cpufreq`, `cpuidle`,
    /// `cpu-1`, out-of-range numbers, ...).
    pub fn from_entry_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix(CORE_ENTRY_PREFIX)?;
        digits.parse::<u16>().ok().map(Self)
    }

    pub fn entry_name(self) -> String {
        format!("{CORE_ENTRY_PREFIX}{}", self.0)
    }
}

impl From<u16> for CoreId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to the CPU device directory.
pub trait CpuDevices {
    /// Directory the entries are listed from, for diagnostics.
    fn root(&self) -> &Path;
    /// Names of all entries in the CPU device directory.
    fn list_entries(&self) -> io::Result<Vec<String>>;
    /// Raw content of the core's `online` attribute.
    fn read_online(&self, core: CoreId) -> io::Result<String>;
    /// Overwrites the core's `online` attribute. The attribute must exist.
    fn write_online(&self, core: CoreId, value: &[u8]) -> io::Result<()>;
}

impl<T: CpuDevices + ?Sized> CpuDevices for &T {
    fn root(&self) -> &Path {
        (**self).root()
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        (**self).list_entries()
    }

    fn read_online(&self, core: CoreId) -> io::Result<String> {
        (**self).read_online(core)
    }

    fn write_online(&self, core: CoreId, value: &[u8]) -> io::Result<()> {
        (**self).write_online(core, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsCpuDevices {
    root: PathBuf,
}

impl SysfsCpuDevices {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn online_path(&self, core: CoreId) -> PathBuf {
        self.root.join(core.entry_name()).join(ONLINE_ATTRIBUTE)
    }
}

impl Default for SysfsCpuDevices {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_DEVICE_DIR)
    }
}

impl CpuDevices for SysfsCpuDevices {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            // Non UTF-8 names can never be `cpu<digits>`.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_online(&self, core: CoreId) -> io::Result<String> {
        fs::read_to_string(self.online_path(core))
    }

    fn write_online(&self, core: CoreId, value: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.online_path(core))?;
        file.write_all(value)?;
        file.flush()
    }
}

/// In-memory CPU device directory.
///
/// Records every write in order and counts directory listings so callers can
/// observe caching. Faults can be injected per operation.
#[derive(Debug, Default)]
pub struct InMemoryCpuDevices {
    root: PathBuf,
    entries: RefCell<BTreeSet<String>>,
    online: RefCell<BTreeMap<CoreId, String>>,
    writes: RefCell<Vec<(CoreId, String)>>,
    listings: Cell<usize>,
    listing_budget: Cell<Option<usize>>,
    failing_reads: RefCell<BTreeSet<CoreId>>,
    failing_writes: RefCell<BTreeSet<CoreId>>,
}

impl InMemoryCpuDevices {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("memory://cpu"),
            ..Self::default()
        }
    }

    /// Adds `cpu<N>` with the given raw `online` content. Core 0 is added
    /// without an attribute, like on real hardware.
    pub fn with_core(self, core: u16, online: &str) -> Self {
        let core = CoreId::new(core);
        self.entries.borrow_mut().insert(core.entry_name());
        if !core.is_primary() {
            self.online.borrow_mut().insert(core, online.to_string());
        }
        self
    }

    /// Adds an entry that is not a core (e.g. `cpufreq`).
    pub fn with_entry(self, name: &str) -> Self {
        self.entries.borrow_mut().insert(name.to_string());
        self
    }

    /// Lets `count` listings succeed; every later listing fails.
    pub fn fail_listing_after(&self, count: usize) {
        self.listing_budget.set(Some(count));
    }

    pub fn fail_reads_for(&self, core: u16) {
        self.failing_reads.borrow_mut().insert(CoreId::new(core));
    }

    pub fn fail_writes_for(&self, core: u16) {
        self.failing_writes.borrow_mut().insert(CoreId::new(core));
    }

    pub fn listings(&self) -> usize {
        self.listings.get()
    }

    pub fn writes(&self) -> Vec<(CoreId, String)> {
        self.writes.borrow().clone()
    }

    pub fn online_value(&self, core: u16) -> Option<String> {
        self.online.borrow().get(&CoreId::new(core)).cloned()
    }
}

impl CpuDevices for InMemoryCpuDevices {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        if let Some(budget) = self.listing_budget.get() {
            if budget == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "listing disabled",
                ));
            }
            self.listing_budget.set(Some(budget - 1));
        }
        self.listings.set(self.listings.get() + 1);
        Ok(self.entries.borrow().iter().cloned().collect())
    }

    fn read_online(&self, core: CoreId) -> io::Result<String> {
        if self.failing_reads.borrow().contains(&core) {
            return Err(io::Error::other(format!("read of cpu{core} refused")));
        }
        self.online
            .borrow()
            .get(&core)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn write_online(&self, core: CoreId, value: &[u8]) -> io::Result<()> {
        if self.failing_writes.borrow().contains(&core) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write to cpu{core} refused"),
            ));
        }
        let value = String::from_utf8_lossy(value).into_owned();
        let mut online = self.online.borrow_mut();
        let slot = online
            .get_mut(&core)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        slot.clone_from(&value);
        self.writes.borrow_mut().push((core, value));
        Ok(())
    }
}
