//! Shared helpers for command implementations.

use std::{
    fs,
    io::{self, Read},
    path::Path,
    process::ExitCode,
};

use sapi_keys::KeysNode;
use serde::de::DeserializeOwned;

/// Reads and deserializes a JSON input file; `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ExitCode> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    let contents = contents.map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        eprintln!("error: invalid JSON in {}: {e}", path.display());
        ExitCode::FAILURE
    })
}

/// Parses a search query, printing the syntax error and hint on failure.
pub fn parse_keys(query: &str) -> Result<Option<KeysNode>, ExitCode> {
    sapi_keys::parse(query).map_err(|e| {
        eprintln!("{}", e.to_string().trim_end());
        ExitCode::FAILURE
    })
}
