//! Implementation of `sapi highlight`.

use std::process::ExitCode;

use sapi_highlight::{Highlighter, ResultSet};

use super::shared::{parse_keys, read_json};
use crate::cli::{
    args::HighlightCommand,
    context::CommandContext,
    output::{dim, header, print_json, subheader},
};

/// Highlights a result set and prints the excerpts or the processed set.
pub fn run(ctx: &CommandContext, cmd: &HighlightCommand) -> ExitCode {
    let mut results: ResultSet = match read_json(&cmd.input) {
        Ok(results) => results,
        Err(code) => return code,
    };

    if let Some(query) = &cmd.keys {
        results.keys = match parse_keys(query) {
            Ok(keys) => keys,
            Err(code) => return code,
        };
    }

    let highlighter = Highlighter::new(ctx.config.highlight.clone());
    let report = highlighter.postprocess_search_results(&mut results);
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    if cmd.output.json {
        return print_json(&results);
    }

    print_results(&results);
    println!(
        "{}",
        dim(&format!(
            "─── {} results, {} items, {} fields highlighted, {} excerpts ───",
            results.result_count, report.items, report.fields_highlighted, report.excerpts
        ))
    );
    ExitCode::SUCCESS
}

/// Prints each item with its excerpt and highlighted fields.
fn print_results(results: &ResultSet) {
    let highlighted = results.highlighted_fields();

    for result in &results.items {
        println!(
            "{} {}",
            header(&result.item.id),
            dim(&format!("(score {:.2})", result.score))
        );

        match &result.excerpt {
            Some(excerpt) => println!("   {excerpt}"),
            None => println!("   {}", dim("(no excerpt)")),
        }

        if let Some(fields) = highlighted.and_then(|h| h.get(&result.item.id)) {
            for (name, values) in fields {
                println!("   {}", subheader(&format!("{name}:")));
                for value in values {
                    println!("      {value}");
                }
            }
        }
        println!();
    }
}
