//! CPU hotplug over the sysfs device directory.
//!
//! - [`CoreEnumerator`] discovers the cores once per run
//! - [`StatusReader`] reads the online flag of a core
//! - [`StatusWriter`] validates and flips the online flag
//! - [`CoreControl`] ties the three together for one run

use std::collections::BTreeSet;
use std::fmt;

use cpuonline_sysfs::CoreId;

pub mod control;
pub mod discovery;
pub mod status;
pub mod switch;

pub use control::CoreControl;
pub use discovery::CoreEnumerator;
pub use status::{StatusReader, StatusReport};
pub use switch::StatusWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreStatus {
    Online,
    Offline,
}

impl CoreStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            CoreStatus::Online
        } else {
            CoreStatus::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == CoreStatus::Online
    }

    /// Value written to the `online` attribute to reach this status.
    pub fn as_sysfs_value(self) -> &'static [u8] {
        match self {
            CoreStatus::Online => b"1",
            CoreStatus::Offline => b"0",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoreStatus::Online => "online",
            CoreStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for CoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cores found in the device directory, in listing order and without
/// duplicates. Listings are name-sorted, so `cpu10` comes before `cpu2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreSet {
    cores: Vec<CoreId>,
    members: BTreeSet<CoreId>,
}

impl CoreSet {
    pub fn contains(&self, core: CoreId) -> bool {
        self.members.contains(&core)
    }

    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CoreId> + '_ {
        self.cores.iter().copied()
    }

    pub fn as_slice(&self) -> &[CoreId] {
        &self.cores
    }
}

impl FromIterator<CoreId> for CoreSet {
    fn from_iter<I: IntoIterator<Item = CoreId>>(iter: I) -> Self {
        let mut set = Self::default();
        for core in iter {
            if set.members.insert(core) {
                set.cores.push(core);
            }
        }
        set
    }
}

/// Which cores a status change targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreSelection {
    /// Every discovered core.
    All,
    /// The listed cores, in order. Duplicates are kept.
    Specific(Vec<CoreId>),
}

impl CoreSelection {
    /// `All` when `ids` is empty, mirroring `on`/`off` without arguments.
    pub fn from_ids(ids: &[u16]) -> Self {
        if ids.is_empty() {
            CoreSelection::All
        } else {
            CoreSelection::Specific(ids.iter().copied().map(CoreId::new).collect())
        }
    }
}

/// Formats a core list like `[1 2 3]`.
pub(crate) fn format_core_list(cores: &[CoreId]) -> String {
    let items: Vec<String> = cores.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_set_keeps_first_occurrence_order() {
        let set: CoreSet = [3, 1, 10, 1, 0].into_iter().map(CoreId::new).collect();
        let ids: Vec<u16> = set.iter().map(CoreId::get).collect();
        assert_eq!(ids, vec![3, 1, 10, 0]);
        assert!(set.contains(CoreId::new(10)));
        assert!(!set.contains(CoreId::new(2)));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn selection_from_ids() {
        assert_eq!(CoreSelection::from_ids(&[]), CoreSelection::All);
        assert_eq!(
            CoreSelection::from_ids(&[2, 2, 1]),
            CoreSelection::Specific(vec![CoreId::new(2), CoreId::new(2), CoreId::new(1)])
        );
    }

    #[test]
    fn status_encoding() {
        assert_eq!(CoreStatus::Online.as_sysfs_value(), b"1");
        assert_eq!(CoreStatus::Offline.as_sysfs_value(), b"0");
        assert_eq!(CoreStatus::from_online(false).to_string(), "offline");
        assert!(CoreStatus::from_online(true).is_online());
    }

    #[test]
    fn core_list_formatting() {
        assert_eq!(format_core_list(&[]), "[]");
        assert_eq!(
            format_core_list(&[CoreId::new(5), CoreId::new(999)]),
            "[5 999]"
        );
    }
}
