//! Command implementations and dispatch.

pub mod aggregate;
pub mod check;
pub mod config;
pub mod highlight;
pub mod init;
pub mod keys;
mod shared;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config(cmd) => config::run(ctx, &cmd),
        Commands::Keys(cmd) => keys::run(&cmd),
        Commands::Aggregate(cmd) => aggregate::run(ctx, &cmd),
        Commands::Highlight(cmd) => highlight::run(ctx, &cmd),
    }
}
