use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const LEDGER_HELP_COMMAND: &str = "spendlens validate --help";
pub(crate) const LEDGER_HELP_SECTION_TITLE: &str = "Ledger Troubleshooting";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl EngineError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_ledger_help(self) -> Self {
        self.with_ledger_help_data(json!({}))
    }

    pub fn with_ledger_help_data(self, data: Value) -> Self {
        self.with_data(merge_ledger_help_data(data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `spendlens {cmd} --help` for usage."),
            None => "Run `spendlens --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_ledger_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "invalid_ledger_format",
            message,
            vec![
                "Provide the ledger as CSV with a header row or as a JSON array of objects."
                    .to_string(),
                "Run `spendlens validate --help` to confirm the column requirements.".to_string(),
            ],
        )
        .with_ledger_help_data(json!({
            "received_format": received_format,
            "supported_formats": ["csv", "json_array"],
        }))
    }

    /// Structural incompatibility between the ledger and the transaction schema.
    ///
    /// Raised only when a required column is absent from the source as a
    /// whole. Bad values inside rows never produce this error; they are
    /// coerced or dropped and reported as diagnostics instead.
    pub fn ledger_schema_mismatch(
        missing_columns: Vec<String>,
        actual_columns: Vec<String>,
        row_indices: Vec<i64>,
    ) -> Self {
        let listed = missing_columns.join(", ");
        Self::new(
            "ledger_schema_mismatch",
            &format!("Ledger is missing required columns: {listed}."),
            vec![
                "Include the Item, Category, Cost and Date columns; Notes is optional.".to_string(),
                "Column names are matched without regard to case or surrounding spaces."
                    .to_string(),
                "Rerun `spendlens validate <path>` once the columns are present.".to_string(),
            ],
        )
        .with_ledger_help_data(json!({
            "missing_columns": missing_columns,
            "actual_columns": actual_columns,
            "row_indices": row_indices,
        }))
    }

    pub fn ledger_read_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "ledger_read_failed",
            &format!("Could not read ledger `{location}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Pass `-` as the path to read the ledger from stdin.".to_string(),
            ],
        )
        .with_ledger_help()
    }

    pub fn config_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "config_invalid",
            &format!("Configuration file `{location}` could not be parsed: {detail}"),
            vec![
                format!("Fix or remove `{location}`; defaults apply when it is absent."),
                "Set `SPENDLENS_HOME` to point at a different configuration directory."
                    .to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_ledger_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(LEDGER_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(LEDGER_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type EngineResult<T> = Result<T, EngineError>;
