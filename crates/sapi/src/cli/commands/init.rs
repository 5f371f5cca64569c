//! Implementation of `sapi init`.

use std::{fs, process::ExitCode};

use sapi_config::template;

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{indent, print_toml, subheader},
};

/// Writes a commented `.sapi.toml` template.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let config_path = ctx.config_target();

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = template();
    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    print_toml(&indent(&template), false);
    println!();

    ExitCode::SUCCESS
}
