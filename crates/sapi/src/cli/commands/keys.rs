//! Implementation of `sapi keys`.

use std::process::ExitCode;

use sapi_keys::KeysNode;
use serde::Serialize;

use super::shared::parse_keys;
use crate::cli::{
    args::KeysCommand,
    output::{dim, print_json, subheader},
};

/// JSON output for `sapi keys`.
#[derive(Serialize)]
struct JsonKeysOutput<'a> {
    /// The query as given.
    query: &'a str,
    /// The parsed keys, `None` for an empty query.
    keys: Option<&'a KeysNode>,
    /// Keywords a highlighter would wrap.
    keywords: Vec<String>,
}

/// Parses a query and shows the keys tree and the keywords to highlight.
pub fn run(cmd: &KeysCommand) -> ExitCode {
    let keys = match parse_keys(&cmd.query) {
        Ok(keys) => keys,
        Err(code) => return code,
    };
    let keywords = keys
        .as_ref()
        .map(KeysNode::positive_keywords)
        .unwrap_or_default();

    if cmd.output.json {
        return print_json(&JsonKeysOutput {
            query: &cmd.query,
            keys: keys.as_ref(),
            keywords,
        });
    }

    let Some(keys) = keys else {
        println!("{}", dim("(empty query)"));
        return ExitCode::SUCCESS;
    };

    println!("{}", subheader("Keys:"));
    for line in keys.to_string().lines() {
        println!("   {line}");
    }
    println!();

    println!("{}", subheader("Query:"));
    println!("   {}", keys.to_query_string());
    println!();

    println!("{}", subheader("Keywords:"));
    if keywords.is_empty() {
        println!("   {}", dim("(none, nothing will be highlighted)"));
    }
    for keyword in &keywords {
        println!("   {keyword}");
    }

    ExitCode::SUCCESS
}
