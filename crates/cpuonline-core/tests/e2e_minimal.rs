use std::fs;
use std::path::Path;

use clap::Parser;
use cpuonline_core::cli::{self, Cli};
use cpuonline_core::config::Config;
use cpuonline_core::{CoreError, ErrorKind};
use tempfile::TempDir;

/// Builds a sysfs-like tree: cpu0 without `online`, cpu1=1, cpu2=0, cpu3=1,
/// plus the usual non-core entries.
fn fake_sysfs() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("cpu0")).expect("cpu0");
    for (core, online) in [(1, "1\n"), (2, "0\n"), (3, "1\n")] {
        let core_dir = dir.path().join(format!("cpu{core}"));
        fs::create_dir(&core_dir).expect("core dir");
        fs::write(core_dir.join("online"), online).expect("online");
    }
    for name in ["cpufreq", "cpuidle", "power"] {
        fs::create_dir(dir.path().join(name)).expect("extra dir");
    }
    fs::write(dir.path().join("online"), "0-3\n").expect("online range");
    dir
}

fn online_value(root: &Path, core: u16) -> String {
    fs::read_to_string(root.join(format!("cpu{core}")).join("online")).expect("read online")
}

fn run(root: &Path, args: &[&str]) -> (Result<(), CoreError>, String) {
    let root = root.to_str().expect("utf8 path");
    let mut argv = vec!["cpuonline", "--sysfs-root", root];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("parse cli");
    let mut out = Vec::new();
    let config = Config::from_cli(&cli);
    let result = cli::run(&config, &cli.command(), &mut out);
    (result, String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn status_lists_every_core_in_order() {
    let sysfs = fake_sysfs();
    let invocations: [&[&str]; 2] = [&[], &["status"]];
    for args in invocations {
        let (result, output) = run(sysfs.path(), args);
        result.expect("status");
        assert_eq!(
            output,
            "CPU0 is online\nCPU1 is online\nCPU2 is offline\nCPU3 is online\n"
        );
    }
}

#[test]
fn off_writes_even_when_already_offline() {
    let sysfs = fake_sysfs();
    fs::write(sysfs.path().join("cpu2/online"), "0\n").expect("reset");

    let (result, output) = run(sysfs.path(), &["off", "2"]);
    result.expect("off");

    // The trailing newline disappears only if the file was rewritten.
    assert_eq!(online_value(sysfs.path(), 2), "0");
    assert!(output.contains("CPU2 is offline\n"));
}

#[test]
fn on_unknown_core_fails_validation_without_report() {
    let sysfs = fake_sysfs();
    let (result, output) = run(sysfs.path(), &["on", "7"]);

    let err = result.expect_err("7 is not a core");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "invalid CPU number: 7");
    assert!(!output.contains(" is online"));
}

#[test]
fn partial_failure_keeps_earlier_changes() {
    let sysfs = fake_sysfs();
    let (result, _) = run(sysfs.path(), &["off", "1", "999", "3"]);

    assert!(matches!(result, Err(CoreError::InvalidCore(_))));
    assert_eq!(online_value(sysfs.path(), 1), "0");
    assert_eq!(online_value(sysfs.path(), 3), "1\n");
}

#[test]
fn off_then_on_round_trips() {
    let sysfs = fake_sysfs();
    run(sysfs.path(), &["off", "3"]).0.expect("off");
    assert_eq!(online_value(sysfs.path(), 3), "0");

    let (result, output) = run(sysfs.path(), &["on", "3"]);
    result.expect("on");
    assert_eq!(online_value(sysfs.path(), 3), "1");
    assert!(output.ends_with("CPU3 is online\n"));
}

#[test]
fn on_without_ids_switches_all_but_the_primary() {
    let sysfs = fake_sysfs();
    let (result, output) = run(sysfs.path(), &["on"]);
    result.expect("on");

    assert!(!sysfs.path().join("cpu0/online").exists());
    for core in 1..=3 {
        assert_eq!(online_value(sysfs.path(), core), "1");
    }
    assert_eq!(
        output,
        "Changing status for cpus: [0 1 2 3] to online\n\
         CPU0 is online\nCPU1 is online\nCPU2 is online\nCPU3 is online\n"
    );
}

#[test]
fn missing_device_directory_is_an_io_error() {
    let sysfs = fake_sysfs();
    let missing = sysfs.path().join("nope");
    let (result, output) = run(&missing, &["status"]);

    let err = result.expect_err("no directory");
    assert!(matches!(err, CoreError::Discovery { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(output.is_empty());
}

#[test]
fn garbage_status_file_stops_the_report() {
    let sysfs = fake_sysfs();
    fs::write(sysfs.path().join("cpu2/online"), "maybe\n").expect("garbage");

    let (result, output) = run(sysfs.path(), &["status"]);
    assert!(matches!(result, Err(CoreError::ParseStatus { .. })));
    assert_eq!(output, "CPU0 is online\nCPU1 is online\n");
}

#[test]
fn cores_are_reported_in_directory_name_order() {
    let sysfs = fake_sysfs();
    for core in 4..=11 {
        let core_dir = sysfs.path().join(format!("cpu{core}"));
        fs::create_dir(&core_dir).expect("core dir");
        fs::write(core_dir.join("online"), "1\n").expect("online");
    }

    let (result, output) = run(sysfs.path(), &["status"]);
    result.expect("status");
    let position = |needle: &str| output.find(needle).expect("core line");
    assert!(position("CPU10 is") < position("CPU2 is"));
    assert!(position("CPU11 is") < position("CPU2 is"));
    assert!(output.starts_with("CPU0 is online\nCPU1 is online\nCPU10 is online\n"));
}
