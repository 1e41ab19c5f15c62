//! rendr CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, resolve the
//! render request and exit with status 1 on any failed resolution step.
//! For programmatic use, prefer the library API (`rendr::api`).

use clap::Parser;

mod cli;

fn main() {
    let args = cli::CliArgs::parse();
    if let Err(e) = cli::run(args) {
        eprintln!("{e}");
        for line in e.remediation() {
            eprintln!("{line}");
        }
        std::process::exit(e.exit_code());
    }
}
