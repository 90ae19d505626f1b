//! `dotlink` binary entry point.
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::logging::{Logger, init_subscriber};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.resolved_command();

    if command == Command::Version {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));

    let result = match &command {
        Command::Restore => commands::restore::run(&args.global, &log),
        Command::Stow(opts) => commands::stow::run(&args.global, opts, &log),
        Command::Unstow(opts) => commands::unstow::run(&args.global, opts, &log),
        Command::Version => Ok(commands::RunStatus::Clean),
    };

    match result {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
