//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pactum CLI - Extract structured fields from contracts with an LLM.
#[derive(Debug, Parser)]
#[command(name = "pactum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract fields from a contract and write JSON and CSV output
    Extract(ExtractArgs),

    /// Extract fields, then review and edit them interactively
    Review(ExtractArgs),

    /// Print the prompt that would be sent for a contract
    Prompt(PromptArgs),

    /// Run the response parser on a saved model reply
    Parse(ParseArgs),

    /// List the fields of the active schema
    Schema(SchemaArgs),
}

/// Schema selection shared by several commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SchemaSelection {
    /// Built-in schema version (batch or review)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// JSON schema definition file (overrides --schema)
    #[arg(long)]
    pub schema_file: Option<PathBuf>,
}

/// Arguments for the extract and review commands.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Contract file (.pdf, .txt, .md)
    pub input: PathBuf,

    #[command(flatten)]
    pub schema: SchemaSelection,

    /// Model name (e.g., gemini-2.0-flash)
    #[arg(short, long)]
    pub model: Option<String>,

    /// JSON output path
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// CSV output path
    #[arg(long)]
    pub csv_out: Option<PathBuf>,

    /// Print results without writing files
    #[arg(long)]
    pub no_write: bool,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    /// Contract file (.pdf, .txt, .md)
    pub input: PathBuf,

    #[command(flatten)]
    pub schema: SchemaSelection,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// File holding the raw model reply
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the reply from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub schema: SchemaSelection,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
