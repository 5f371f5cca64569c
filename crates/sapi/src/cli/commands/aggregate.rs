//! Implementation of `sapi aggregate`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sapi_index::{AggregationReport, Aggregator, Index, Item};

use super::shared::read_json;
use crate::cli::{
    args::AggregateCommand,
    context::CommandContext,
    output::{dim, print_json},
};

/// Separator between values in a table cell.
const VALUE_SEPARATOR: &str = " | ";

/// Applies every aggregation rule to the input items.
///
/// Skipped values are logged as warnings on stderr.
pub fn run(ctx: &CommandContext, cmd: &AggregateCommand) -> ExitCode {
    let index = match ctx.index() {
        Ok(index) => index,
        Err(code) => return code,
    };
    let aggregator = match Aggregator::new(&index) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            eprintln!("error: invalid index definition: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut items: Vec<Item> = match read_json(&cmd.input) {
        Ok(items) => items,
        Err(code) => return code,
    };

    let report = aggregator.aggregate_items(&mut items);

    if cmd.output.json {
        return print_json(&items);
    }

    print_table(&index, &items);
    println!("{}", dim(&summary(&report)));
    ExitCode::SUCCESS
}

/// Prints the derived fields of every item.
fn print_table(index: &Index, items: &[Item]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Item", "Field", "Type", "Values"]);

    for item in items {
        for rule in &index.rules {
            let Some(field) = item.field(&rule.field_id) else {
                continue;
            };
            let values: Vec<String> = field.values().iter().map(|v| v.to_text()).collect();
            table.add_row(vec![
                Cell::new(&item.id),
                Cell::new(field.name()),
                Cell::new(field.field_type()),
                Cell::new(values.join(VALUE_SEPARATOR)),
            ]);
        }
    }

    println!("{table}");
}

/// Describes a batch run in one line.
fn summary(report: &AggregationReport) -> String {
    let mut parts = vec![
        format!("{} items", report.items),
        format!("{} fields set", report.fields_set),
        format!("{} unchanged", report.skipped),
    ];
    if !report.warnings.is_empty() {
        parts.push(format!("{} values skipped", report.warnings.len()));
    }
    format!("─── {} ───", parts.join(", "))
}
