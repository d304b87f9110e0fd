//! Interactive review loop.
//!
//! Edits a [`FormState`] line by line. Each field is addressed by its number
//! in `show` output or by name.

use crate::commands::extract::{self, OutputTargets};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::form::FormState;
use crate::output::Formatter;
use pactum_domain::{ExtractionResult, Schema};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::debug;

/// Run the review loop until the user exits.
pub fn run_review(mut session: ReviewSession, history_size: usize, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Review the extracted fields - Type 'help' for commands, 'exit' to finish")
    );
    println!();
    println!("{}", formatter.format_form(&session.form, &session.schema));

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    if let Err(e) = editor.load_history(&history_path) {
        debug!("No review history loaded: {}", e);
    }

    loop {
        let prompt = if session.form.is_modified() {
            "review*> "
        } else {
            "review> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_review_command(line) {
                    Ok(command) => match session.handle(command, formatter) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Exit) => break,
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to finish"));
            }
            Err(ReadlineError::Eof) => {
                session.farewell(formatter);
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// One parsed line of review input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewCommand {
    /// Print the form
    Show,
    /// Set a field from text
    Set {
        /// Field number or name
        selector: String,
        /// Raw input for the field's widget
        value: String,
    },
    /// Empty a field
    Clear(String),
    /// Revert all edits
    Reset,
    /// Print the edited values as JSON
    Json,
    /// Write JSON and CSV files
    Save,
    /// Print help
    Help,
    /// Leave the loop
    Exit,
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read another line
    Continue,
    /// Stop reading
    Exit,
}

/// Parse a review command line.
pub fn parse_review_command(line: &str) -> Result<ReviewCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_lowercase().as_str() {
        "" => Err(CliError::InvalidInput("Empty command".to_string())),
        "show" | "ls" => Ok(ReviewCommand::Show),
        "set" => {
            let (selector, value) = rest
                .split_once('=')
                .filter(|(selector, _)| !selector.trim().is_empty())
                .ok_or_else(|| CliError::InvalidInput("Usage: set <field|#> = <value>".to_string()))?;
            Ok(ReviewCommand::Set {
                selector: selector.trim().to_string(),
                value: value.trim().to_string(),
            })
        }
        "clear" => {
            if rest.is_empty() {
                return Err(CliError::InvalidInput("Usage: clear <field|#>".to_string()));
            }
            Ok(ReviewCommand::Clear(rest.to_string()))
        }
        "reset" => Ok(ReviewCommand::Reset),
        "json" => Ok(ReviewCommand::Json),
        "save" => Ok(ReviewCommand::Save),
        "help" | "?" => Ok(ReviewCommand::Help),
        "exit" | "quit" | "q" | "done" => Ok(ReviewCommand::Exit),
        other => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            other
        ))),
    }
}

/// Form plus what it needs to edit and save.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    /// Seeded and edited values
    pub form: FormState,
    schema: Schema,
    targets: Option<OutputTargets>,
    saved: Option<ExtractionResult>,
}

impl ReviewSession {
    /// Create a session; `targets` of `None` disables `save`.
    pub fn new(form: FormState, schema: Schema, targets: Option<OutputTargets>) -> Self {
        Self {
            form,
            schema,
            targets,
            saved: None,
        }
    }

    /// True if the edited values differ from what was last saved.
    pub fn has_unsaved_changes(&self) -> bool {
        match &self.saved {
            Some(saved) => *saved != self.form.edited,
            None => self.form.is_modified(),
        }
    }

    /// Apply one command.
    pub fn handle(&mut self, command: ReviewCommand, formatter: &Formatter) -> Result<Flow> {
        match command {
            ReviewCommand::Show => {
                println!("{}", formatter.format_form(&self.form, &self.schema));
            }
            ReviewCommand::Set { selector, value } => {
                let field = self.form.resolve_field(&selector)?;
                self.form.set(&self.schema, &field, &value)?;
                debug!("Set '{}' to {:?}", field, value);
                println!("{}", formatter.success(&format!("{} updated", field)));
            }
            ReviewCommand::Clear(selector) => {
                let field = self.form.resolve_field(&selector)?;
                self.form.clear(&self.schema, &field);
                println!("{}", formatter.success(&format!("{} cleared", field)));
            }
            ReviewCommand::Reset => {
                self.form.reset();
                println!("{}", formatter.info("All fields reverted to extracted values"));
            }
            ReviewCommand::Json => {
                println!("{}", self.form.to_json_pretty()?);
            }
            ReviewCommand::Save => {
                let targets = self.targets.as_ref().ok_or_else(|| {
                    CliError::InvalidInput("Saving is disabled (--no-write)".to_string())
                })?;
                extract::write_outputs(&self.form.edited, targets, formatter)?;
                self.saved = Some(self.form.edited.clone());
            }
            ReviewCommand::Help => print_help(formatter),
            ReviewCommand::Exit => {
                self.farewell(formatter);
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn farewell(&self, formatter: &Formatter) {
        if self.has_unsaved_changes() {
            println!(
                "{}",
                formatter.warning(&format!(
                    "Leaving with unsaved edits to: {}",
                    self.form.changed_fields().join(", ")
                ))
            );
        } else {
            println!("{}", formatter.info("Goodbye!"));
        }
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  show, ls                       - Show the form");
    println!("  set <field|#> = <value>        - Edit a field");
    println!("    numbers: whole numbers at or above the field minimum");
    println!("    dates: MM/DD/YYYY");
    println!("    yes/no and select fields: a listed option, or 'none' to unset");
    println!("  clear <field|#>                - Empty a field");
    println!("  reset                          - Revert every edit");
    println!("  json                           - Show the edited values as JSON");
    println!("  save                           - Write JSON and CSV output");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q, done            - Finish reviewing");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pactum_domain::{Scalar, SchemaVersion};
    use std::fs;

    fn session(targets: Option<OutputTargets>) -> ReviewSession {
        let schema = Schema::builtin(SchemaVersion::Review);
        let mut parsed = ExtractionResult::new();
        parsed.insert("Partner Name", "Acme Health Plan");
        parsed.insert("Effective date", "2024-01-15");
        parsed.insert("Eligible users", 1200);
        parsed.insert("Reconciliation Method", "monthly_Fee");
        let (form, warnings) = FormState::seed(&schema, &parsed);
        assert!(warnings.is_empty());
        ReviewSession::new(form, schema, targets)
    }

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_review_command("show").unwrap(), ReviewCommand::Show);
        assert_eq!(parse_review_command("  QUIT ").unwrap(), ReviewCommand::Exit);
        assert_eq!(
            parse_review_command("set Partner Name = Acme Corp").unwrap(),
            ReviewCommand::Set {
                selector: "Partner Name".to_string(),
                value: "Acme Corp".to_string(),
            }
        );
        assert_eq!(
            parse_review_command("set 3 =").unwrap(),
            ReviewCommand::Set {
                selector: "3".to_string(),
                value: String::new(),
            }
        );
        assert_eq!(
            parse_review_command("clear Effective date").unwrap(),
            ReviewCommand::Clear("Effective date".to_string())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_review_command("set Partner Name").is_err());
        assert!(parse_review_command("set = x").is_err());
        assert!(parse_review_command("clear").is_err());
        assert!(parse_review_command("delete 1").is_err());
    }

    #[test]
    fn test_edit_then_reset() {
        let mut session = session(None);
        let f = formatter();

        session
            .handle(
                ReviewCommand::Set {
                    selector: "3".to_string(),
                    value: "1300".to_string(),
                },
                &f,
            )
            .unwrap();
        assert_eq!(session.form.edited.get("Eligible users"), Some(&Scalar::Integer(1300)));
        assert!(session.has_unsaved_changes());

        session
            .handle(ReviewCommand::Clear("reconciliation method".to_string()), &f)
            .unwrap();
        assert_eq!(session.form.edited.get("Reconciliation Method"), Some(&Scalar::Null));

        session.handle(ReviewCommand::Reset, &f).unwrap();
        assert_eq!(session.form.edited, session.form.original);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_rejected_edit_leaves_form_unchanged() {
        let mut session = session(None);
        let before = session.form.clone();

        let err = session
            .handle(
                ReviewCommand::Set {
                    selector: "Reconciliation Method".to_string(),
                    value: "quarterly".to_string(),
                },
                &formatter(),
            )
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert_eq!(session.form, before);
    }

    #[test]
    fn test_save_writes_edited_values() {
        let dir = tempfile::tempdir().unwrap();
        let targets = OutputTargets {
            json: dir.path().join("review.json"),
            csv: dir.path().join("review.csv"),
        };
        let mut session = session(Some(targets.clone()));
        let f = formatter();

        session
            .handle(
                ReviewCommand::Set {
                    selector: "Partner Name".to_string(),
                    value: "Acme Corp".to_string(),
                },
                &f,
            )
            .unwrap();
        session.handle(ReviewCommand::Save, &f).unwrap();

        assert!(!session.has_unsaved_changes());
        let csv = fs::read_to_string(&targets.csv).unwrap();
        assert!(csv.starts_with("Partner Name,Acme Corp\nEffective date,01/15/2024\n"));
        assert_eq!(session.handle(ReviewCommand::Exit, &f).unwrap(), Flow::Exit);
    }

    #[test]
    fn test_save_disabled_without_targets() {
        let mut session = session(None);
        assert!(session.handle(ReviewCommand::Save, &formatter()).is_err());
    }
}
