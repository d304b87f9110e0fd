//! Schema command implementation.

use crate::cli::SchemaArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the schema command.
pub fn execute_schema(args: SchemaArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let schema = config.extractor_config(&args.schema, None)?.load_schema()?;
    println!("{}", formatter.format_schema(&schema)?);
    Ok(())
}
