//! Command-line interface for the `sapi` search API tools.

use std::process::ExitCode;

use sapi::cli::{CommandContext, args::parse_cli, commands, logging};

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init();

    let ctx = match CommandContext::for_command(&cli.command, cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}
