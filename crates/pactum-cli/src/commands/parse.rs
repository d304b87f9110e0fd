//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pactum_extractor::{parse_response_detailed, ParsedResponse};
use std::fs;
use std::io::{self, Read};

/// Execute the parse command.
///
/// Runs the recovery parser over a saved model reply and prints what it found.
pub fn execute_parse(args: ParseArgs, formatter: &Formatter) -> Result<()> {
    let raw = read_reply(&args)?;
    let parsed = recover(&raw)?;

    if parsed.anomalies.is_empty() {
        eprintln!(
            "{}",
            formatter.success(&format!("Recovered {} field(s)", parsed.result.len()))
        );
    } else {
        eprintln!("{}", formatter.format_anomalies(&parsed.anomalies));
    }
    println!("{}", formatter.format_result(&parsed.result)?);
    Ok(())
}

fn read_reply(args: &ParseArgs) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = &args.file {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ))
    }
}

fn recover(raw: &str) -> Result<ParsedResponse> {
    Ok(parse_response_detailed(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pactum_domain::Scalar;
    use pactum_extractor::{ExtractorError, ParseError};
    use std::path::PathBuf;

    #[test]
    fn test_parse_saved_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.txt");
        fs::write(
            &path,
            "Sure.\n```json\n{\"Partner Name\": {\"value\": \"Acme\"}, \"Lore users\": 40}\n```\n",
        )
        .unwrap();

        let args = ParseArgs {
            file: Some(path.clone()),
            stdin: false,
        };
        let parsed = recover(&read_reply(&args).unwrap()).unwrap();
        assert_eq!(parsed.result.get("Partner Name"), Some(&Scalar::Text("Acme".into())));
        assert_eq!(parsed.anomalies.len(), 1);

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(execute_parse(ParseArgs { file: Some(path), stdin: false }, &formatter).is_ok());
    }

    #[test]
    fn test_requires_a_source() {
        let args = ParseArgs {
            file: None,
            stdin: false,
        };
        assert!(matches!(read_reply(&args), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let args = ParseArgs {
            file: Some(PathBuf::from("/nonexistent/reply.txt")),
            stdin: false,
        };
        assert!(matches!(read_reply(&args), Err(CliError::Io(_))));
    }

    #[test]
    fn test_no_json_in_reply() {
        let err = recover("The model declined to answer.").unwrap_err();
        assert!(matches!(
            err,
            CliError::Extractor(ExtractorError::Parsing(ParseError::NoJsonFound))
        ));
    }
}
