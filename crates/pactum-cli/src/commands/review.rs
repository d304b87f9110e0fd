//! Review command implementation.

use super::extract::OutputTargets;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::form::FormState;
use crate::output::Formatter;
use crate::repl::{self, ReviewSession};

/// Execute the review command.
///
/// Extracts once, then opens the edit loop over the seeded form.
pub async fn execute_review(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extractor_config = config.extractor_config(&args.schema, args.model.as_deref())?;
    let extractor = super::gemini_extractor(extractor_config)?;
    let targets = OutputTargets::resolve(&args, config);

    eprintln!("{}", formatter.info(&format!("Extracting fields from {}", args.input.display())));
    let extraction = extractor.extract_file(&args.input).await?;
    if !extraction.anomalies.is_empty() {
        eprintln!("{}", formatter.format_anomalies(&extraction.anomalies));
    }

    let (form, warnings) = FormState::seed(extractor.schema(), &extraction.result);
    for warning in &warnings {
        eprintln!("{}", formatter.warning(warning));
    }

    let session = ReviewSession::new(form, extractor.schema().clone(), targets);
    repl::run_review(session, config.settings.history_size, formatter)
}
