//! Prompt command implementation.

use crate::cli::PromptArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use pactum_extractor::{build_prompt, read_document};

/// Execute the prompt command.
///
/// Renders the prompt for a document without calling the model.
pub fn execute_prompt(args: PromptArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let prompt = render(&args, config)?;
    eprintln!(
        "{}",
        formatter.info(&format!("Prompt is {} characters", prompt.chars().count()))
    );
    println!("{}", prompt);
    Ok(())
}

fn render(args: &PromptArgs, config: &Config) -> Result<String> {
    let schema = config.extractor_config(&args.schema, None)?.load_schema()?;
    let text = read_document(&args.input)?;
    Ok(build_prompt(&schema, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SchemaSelection;
    use crate::error::CliError;
    use pactum_extractor::{ExtractorError, CONTRACT_END, CONTRACT_START};
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_prompt_embeds_document_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("contract.txt");
        fs::write(&input, "Subscriber: Acme Health Plan").unwrap();

        let args = PromptArgs {
            input,
            schema: SchemaSelection {
                schema: Some("review".to_string()),
                schema_file: None,
            },
        };
        let prompt = render(&args, &Config::default()).unwrap();

        assert!(prompt.contains(CONTRACT_START));
        assert!(prompt.contains("Subscriber: Acme Health Plan"));
        assert!(prompt.contains(CONTRACT_END));
        assert!(prompt.contains("Reconciliation Method"));
    }

    #[test]
    fn test_missing_document() {
        let args = PromptArgs {
            input: PathBuf::from("/nonexistent/contract.pdf"),
            schema: SchemaSelection::default(),
        };
        let err = render(&args, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Extractor(ExtractorError::SourceRead(_))));
    }
}
