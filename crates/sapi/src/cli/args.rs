//! Clap argument definitions for the `sapi` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Query syntax shared by the `keys` and `highlight` help texts.
const KEYS_SYNTAX: &str = "\
QUERY SYNTAX:
  term              Term must appear
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Exact phrase
  -term             Term must NOT appear (never highlighted)
  term1 OR term2    Either term
  (expr)            Grouping";

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sapi")]
#[command(about = "Search API tools - field aggregation and result highlighting")]
pub struct Cli {
    /// Configuration file to use instead of discovering .sapi.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flag.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sapi init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `sapi config`.
#[derive(Args, Debug, Clone)]
pub struct ConfigCommand {
    /// Print without syntax highlighting
    #[arg(long)]
    pub plain: bool,
}

/// Arguments for `sapi keys`.
#[derive(Args, Debug, Clone)]
pub struct KeysCommand {
    /// Search query
    pub query: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `sapi aggregate`.
#[derive(Args, Debug, Clone)]
pub struct AggregateCommand {
    /// JSON file holding an array of items ("-" reads stdin)
    pub input: PathBuf,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `sapi highlight`.
#[derive(Args, Debug, Clone)]
pub struct HighlightCommand {
    /// JSON file holding a result set ("-" reads stdin)
    pub input: PathBuf,

    /// Search query replacing the keys stored in the result set
    #[arg(short = 'k', long)]
    pub keys: Option<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Supported `sapi` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize sapi configuration in current directory
    Init(InitCommand),

    /// Validate configuration and the index definition
    Check,

    /// Show effective configuration settings
    Config(ConfigCommand),

    /// Show how a search query is parsed
    #[command(after_help = KEYS_SYNTAX)]
    Keys(KeysCommand),

    /// Derive aggregated fields on items
    #[command(after_help = "\
INPUT FORMAT:
  [{\"id\": \"entity:node/1\", \"datasource\": \"entity:node\",
    \"fields\": [{\"name\": \"title\", \"type\": \"text\", \"values\": [\"Hello\"]}]}]

Every aggregation rule in the configuration is applied to every item.")]
    Aggregate(AggregateCommand),

    /// Highlight keywords in search results and build excerpts
    #[command(after_help = KEYS_SYNTAX)]
    Highlight(HighlightCommand),
}

impl Commands {
    /// Returns true if the command needs a usable configuration.
    ///
    /// `init` must work even when an existing configuration file is invalid.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_) | Self::Keys(_))
    }
}

/// Parses CLI arguments, exiting with usage information on error.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
