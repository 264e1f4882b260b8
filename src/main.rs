use std::io;
use std::process::ExitCode;

use clap::Parser;
use cpuonline_core::cli::{self, Cli};
use cpuonline_core::config::Config;
use cpuonline_core::logging::init_logging;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    if let Err(err) = init_logging(&config.log_level) {
        eprintln!("cpuonline: {err}");
        return ExitCode::from(2);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli::run(&config, &cli.command(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(kind = ?err.kind(), core = ?err.core(), error = ?err, "command failed");
            eprintln!("cpuonline: {err}");
            ExitCode::FAILURE
        }
    }
}
