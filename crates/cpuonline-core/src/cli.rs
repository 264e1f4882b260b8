use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cpuonline_sysfs::{CpuDevices, DEFAULT_CPU_DEVICE_DIR};

use crate::config::{Config, DEFAULT_LOG_LEVEL, LOG_LEVEL_ENV, SYSFS_ROOT_ENV};
use crate::error::Result;
use crate::hotplug::{CoreControl, CoreSelection, CoreStatus, format_core_list};

#[derive(Parser, Debug)]
#[command(name = "cpuonline", version, about = "Turn CPU cores on and off through sysfs")]
pub struct Cli {
    /// CPU device directory.
    #[arg(long, global = true, env = SYSFS_ROOT_ENV, default_value = DEFAULT_CPU_DEVICE_DIR)]
    pub sysfs_root: PathBuf,
    /// Log filter for stderr (e.g. `info`, `cpuonline_core=debug`).
    #[arg(long, global = true, env = LOG_LEVEL_ENV, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested command; `status` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Status)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print CPU online status. This is the default when no command is given.
    Status,
    /// Turn CPUs on. Optionally pass a list of CPU numbers to turn on selectively.
    On {
        #[arg(value_name = "CPU")]
        cpus: Vec<u16>,
    },
    /// Turn CPUs off. Optionally pass a list of CPU numbers to turn off selectively.
    Off {
        #[arg(value_name = "CPU")]
        cpus: Vec<u16>,
    },
}

impl Command {
    /// Target status and cores for `on`/`off`, `None` for `status`.
    pub fn change(&self) -> Option<(CoreStatus, CoreSelection)> {
        match self {
            Command::Status => None,
            Command::On { cpus } => Some((CoreStatus::Online, CoreSelection::from_ids(cpus))),
            Command::Off { cpus } => Some((CoreStatus::Offline, CoreSelection::from_ids(cpus))),
        }
    }
}

/// Runs `command` against the device directory named by `config`, writing
/// the report to `out`.
pub fn run<W: Write>(config: &Config, command: &Command, out: &mut W) -> Result<()> {
    let control = CoreControl::new(config.devices());
    dispatch(command, &control, out)
}

pub fn dispatch<D: CpuDevices, W: Write>(
    command: &Command,
    control: &CoreControl<D>,
    out: &mut W,
) -> Result<()> {
    if let Some((target, selection)) = command.change() {
        let writer = control.writer();
        let cores = writer.resolve(&selection)?;
        writeln!(
            out,
            "Changing status for cpus: {} to {}",
            format_core_list(&cores),
            target
        )?;
        writer.set_status(target, &cores)?;
    }
    write_status(control, out)
}

/// Prints `CPU<N> is online|offline` per discovered core. Lines already
/// written stay written when a later core fails.
pub fn write_status<D: CpuDevices, W: Write>(control: &CoreControl<D>, out: &mut W) -> Result<()> {
    for entry in control.report_all()? {
        let (core, status) = entry?;
        writeln!(out, "CPU{core} is {status}")?;
    }
    out.flush()?;
    Ok(())
}
