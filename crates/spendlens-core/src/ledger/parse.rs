use std::collections::BTreeMap;

use serde_json::Value;

use crate::{EngineError, EngineResult};

/// One source row keyed by the column name exactly as it appeared.
pub type RawRow = BTreeMap<String, Value>;

/// Untyped ledger as read from CSV or JSON, before any coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLedger {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawLedger {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }
}

pub fn parse_source(content: &str) -> EngineResult<RawLedger> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_ledger_format(
            "Ledger source is empty.",
            "empty",
        ));
    }

    if looks_like_ndjson(trimmed) {
        return Err(EngineError::invalid_ledger_format(
            "NDJSON is not supported. Provide a JSON array or CSV.",
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(EngineError::invalid_ledger_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        ));
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    Err(EngineError::invalid_ledger_format(
        "Unsupported ledger format. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> EngineResult<RawLedger> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|error| {
        EngineError::invalid_ledger_format(
            &format!("Invalid JSON input: {error}."),
            "json_invalid",
        )
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(EngineError::invalid_ledger_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        ));
    };

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(EngineError::invalid_ledger_format(
                &format!("JSON array entry {} is not an object.", index + 1),
                "json_non_object_entry",
            ));
        };

        let mut row = RawRow::new();
        for (key, value) in object {
            if !columns.iter().any(|existing| existing == key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), value.clone());
        }
        rows.push(row);
    }

    Ok(RawLedger { columns, rows })
}

fn parse_csv(content: &str) -> EngineResult<RawLedger> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = reader
        .headers()
        .map_err(|_| {
            EngineError::invalid_ledger_format("CSV header row is missing or unreadable.", "csv")
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| {
            EngineError::invalid_ledger_format(
                &format!("CSV rows are malformed or not UTF-8: {error}."),
                "csv",
            )
        })?;
        // Short rows leave trailing columns absent rather than blank.
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.clone(), Value::String(cell.to_string())))
            .collect::<RawRow>();
        rows.push(row);
    }

    Ok(RawLedger { columns, rows })
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        serde_json::from_str::<Value>(line.trim())
            .map(|value| value.is_object())
            .unwrap_or(false)
    })
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}
