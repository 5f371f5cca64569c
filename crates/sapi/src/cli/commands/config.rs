//! Implementation of `sapi config`.

use std::process::ExitCode;

use crate::cli::{args::ConfigCommand, context::CommandContext, output::print_toml};

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext, cmd: &ConfigCommand) -> ExitCode {
    match ctx.config.settings_to_toml() {
        Ok(toml) => {
            print_toml(&toml, cmd.plain);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize configuration: {e}");
            ExitCode::FAILURE
        }
    }
}
