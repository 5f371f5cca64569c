//! sapi: search API field aggregation and result highlighting.
//!
//! The `sapi` binary wires a `.sapi.toml` configuration and JSON input files to
//! the sapi libraries. It derives aggregated fields on indexed items, parses search
//! keys, and highlights keywords in search results while building excerpts.

#![warn(missing_docs)]

pub mod cli;
