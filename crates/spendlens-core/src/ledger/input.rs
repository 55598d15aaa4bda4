use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use tracing::debug;

use crate::{EngineError, EngineResult};

pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub source_kind: SourceKind,
    pub source_ref: Option<String>,
    pub content: String,
}

/// Resolves the ledger body from a file path, `-`, or piped stdin.
///
/// Stdin is only consulted when no path is given or the path is `-`.
/// `stdin_override` stands in for the process stdin, which keeps callers and
/// tests independent of the terminal.
pub fn resolve_source(
    path: Option<&str>,
    stdin_override: Option<String>,
) -> EngineResult<ResolvedSource> {
    match path {
        Some(path_value) if path_value != STDIN_PATH => {
            let content = fs::read_to_string(path_value).map_err(|error| {
                EngineError::ledger_read_failed(Path::new(path_value), &error.to_string())
            })?;
            debug!(path = path_value, bytes = content.len(), "read ledger file");
            Ok(ResolvedSource {
                source_kind: SourceKind::File,
                source_ref: Some(path_value.to_string()),
                content,
            })
        }
        explicit => {
            if let Some(content) = read_stdin(stdin_override)? {
                debug!(bytes = content.len(), "read ledger from stdin");
                return Ok(ResolvedSource {
                    source_kind: SourceKind::Stdin,
                    source_ref: None,
                    content,
                });
            }

            let message = if explicit.is_some() {
                "Path `-` means stdin input, but stdin was empty. Pipe CSV/JSON input or pass a file path."
            } else {
                "No ledger source provided. Pass a file path or pipe input via stdin."
            };
            Err(EngineError::invalid_argument_with_recovery(
                message,
                vec![
                    "Run `spendlens summary <path>` with a CSV or JSON ledger.".to_string(),
                    "Or pipe the ledger: `cat ledger.csv | spendlens summary -`.".to_string(),
                ],
            ))
        }
    }
}

fn read_stdin(stdin_override: Option<String>) -> EngineResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(non_blank(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| {
            EngineError::ledger_read_failed(Path::new("<stdin>"), &error.to_string())
        })?;

    Ok(non_blank(buffer))
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    Some(value)
}
