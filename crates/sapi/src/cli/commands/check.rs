//! Implementation of `sapi check`.

use std::process::ExitCode;

use sapi_config::ConfigWarning;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, success, warning},
};

/// Shows the configuration file, the index definition, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    let Some(config_path) = &config.config_path else {
        println!("{}", dim("No configuration file found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("sapi init")
        );
        return ExitCode::SUCCESS;
    };

    println!("{}", subheader("Config file:"));
    println!("   {}", config_path.display());
    println!();

    let index = match ctx.index() {
        Ok(index) => index,
        Err(code) => return code,
    };

    println!("{}", subheader(&format!("Index {}:", index.id)));
    if index.fields.is_empty() {
        println!("   {}", dim("(no fields)"));
    }
    for field in &index.fields {
        let field_type = field
            .field_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| String::from("from aggregation"));
        let scope = field.datasource.as_deref().unwrap_or("all datasources");
        println!(
            "   {} {} {}",
            field.id,
            dim(&format!("({field_type})")),
            dim(&format!("[{scope}]"))
        );
    }
    println!();

    if !index.rules.is_empty() {
        println!("{}", subheader("Aggregations:"));
        for rule in &index.rules {
            let sources: Vec<String> = rule.sources.iter().map(ToString::to_string).collect();
            println!(
                "   {} = {}({})",
                rule.field_id,
                rule.mode,
                sources.join(", ")
            );
        }
        println!();
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("{}", success("No issues found."));
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .filter_map(|w| match w {
            ConfigWarning::NoFieldsDefined => Some("Hint: add [[field]] sections to .sapi.toml"),
            ConfigWarning::AggregatedFieldNotIndexed { .. } => {
                Some("Hint: declare aggregated fields with a [[field]] section")
            }
            ConfigWarning::HighlightProcessorInactive => {
                Some("Hint: set highlight = \"always\" or excerpt = true")
            }
            _ => None,
        })
        .collect();
    hints.dedup();

    for hint in hints {
        println!("{}", dim(hint));
    }
}
