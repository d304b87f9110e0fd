//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pactum_domain::traits::LlmProvider;
use pactum_domain::ExtractionResult;
use pactum_extractor::{persist, Extraction, Extractor, ExtractorError};
use std::path::{Path, PathBuf};
use tracing::error;

/// Where batch results are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTargets {
    /// Pretty-printed JSON destination
    pub json: PathBuf,
    /// Two-column CSV destination
    pub csv: PathBuf,
}

impl OutputTargets {
    /// Resolve destinations from flags, falling back to the config.
    ///
    /// `None` when writing is disabled.
    pub fn resolve(args: &ExtractArgs, config: &Config) -> Option<Self> {
        if args.no_write {
            return None;
        }
        Some(Self {
            json: args.json_out.clone().unwrap_or_else(|| config.output.json_path.clone()),
            csv: args.csv_out.clone().unwrap_or_else(|| config.output.csv_path.clone()),
        })
    }
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extractor_config = config.extractor_config(&args.schema, args.model.as_deref())?;
    let extractor = super::gemini_extractor(extractor_config)?;
    let targets = OutputTargets::resolve(&args, config);

    run_extract(&extractor, &args.input, targets.as_ref(), formatter).await?;
    Ok(())
}

/// Extract one document, echo the result and write the output files.
pub async fn run_extract<L>(
    extractor: &Extractor<L>,
    input: &Path,
    targets: Option<&OutputTargets>,
    formatter: &Formatter,
) -> Result<Extraction>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Into<ExtractorError>,
{
    eprintln!("{}", formatter.info(&format!("Extracting fields from {}", input.display())));
    let extraction = extractor.extract_file(input).await?;

    if !extraction.anomalies.is_empty() {
        eprintln!("{}", formatter.format_anomalies(&extraction.anomalies));
    }
    print_result(&extraction.result, formatter)?;

    if let Some(targets) = targets {
        write_outputs(&extraction.result, targets, formatter)?;
    }
    Ok(extraction)
}

fn print_result(result: &ExtractionResult, formatter: &Formatter) -> Result<()> {
    match formatter.format() {
        OutputFormat::Table => {
            println!("{}", formatter.section("Extracted Data (JSON)"));
            println!("{}", persist::to_pretty_json(result)?);
            println!("{}", formatter.section("Extracted Data (CSV)"));
            print!("{}", persist::to_csv_string(result)?);
        }
        OutputFormat::Json | OutputFormat::Quiet => {
            println!("{}", formatter.format_result(result)?);
        }
    }
    Ok(())
}

/// Write the JSON and CSV files.
///
/// Both writes are attempted; each failure is reported on its own.
pub fn write_outputs(result: &ExtractionResult, targets: &OutputTargets, formatter: &Formatter) -> Result<()> {
    let attempts = [
        ("JSON", &targets.json, persist::write_json(result, &targets.json)),
        ("CSV", &targets.csv, persist::write_csv(result, &targets.csv)),
    ];

    let mut failures = 0;
    for (label, path, outcome) in attempts {
        match outcome {
            Ok(()) => {
                eprintln!("{}", formatter.success(&format!("{} saved to {}", label, path.display())));
            }
            Err(e) => {
                error!("Failed to save {} output: {}", label, e);
                eprintln!("{}", formatter.error(&format!("Failed to save {}: {}", label, e)));
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Output(failures));
    }
    Ok(())
}
