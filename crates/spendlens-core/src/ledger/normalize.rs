use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analytics::types::{Transaction, TransactionSet};
use crate::ledger::coerce::{
    CoerceContext, FIELD_POLICIES, FieldValue, LedgerField, coerce_text, received_text,
    required_fields,
};
use crate::ledger::parse::{RawLedger, RawRow};
use crate::{EngineError, EngineResult};

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// When set, categories outside this list collapse to `Miscellaneous`.
    pub canonical_categories: Option<Vec<String>>,
}

/// Per-row diagnostic produced while coercing a ledger. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionWarning {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    pub received: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub rows_read: i64,
    pub rows_kept: i64,
    pub rows_dropped: i64,
    pub rows_coerced: i64,
}

#[derive(Debug, Clone)]
pub struct NormalizedLedger {
    pub transactions: TransactionSet,
    pub diagnostics: Vec<CoercionWarning>,
    pub summary: NormalizeSummary,
}

pub fn normalize(raw: &RawLedger, options: &NormalizeOptions) -> EngineResult<NormalizedLedger> {
    let columns = resolve_columns(raw)?;

    let mut transactions = Vec::with_capacity(raw.rows.len());
    let mut diagnostics = Vec::new();
    let mut rows_coerced = 0_i64;
    let context = CoerceContext {
        canonical_categories: options.canonical_categories.as_deref(),
    };

    for (index, row) in raw.rows.iter().enumerate() {
        let row_number = (index as i64) + 1;
        if is_blank_row(row) {
            diagnostics.push(CoercionWarning {
                row: row_number,
                field: "*".to_string(),
                code: "blank_row".to_string(),
                description: "Row has no values; it was skipped.".to_string(),
                received: None,
            });
            continue;
        }

        let mut row_warnings = Vec::new();
        let transaction = coerce_row(row_number, row, &columns, &context, &mut row_warnings);

        if let Some(transaction) = transaction {
            if !row_warnings.is_empty() {
                rows_coerced += 1;
            }
            transactions.push(transaction);
        }
        diagnostics.extend(row_warnings);
    }

    let rows_read = raw.rows.len() as i64;
    let rows_kept = transactions.len() as i64;
    let summary = NormalizeSummary {
        rows_read,
        rows_kept,
        rows_dropped: rows_read - rows_kept,
        rows_coerced,
    };

    if !diagnostics.is_empty() {
        warn!(
            diagnostics = diagnostics.len(),
            rows_dropped = summary.rows_dropped,
            rows_coerced = summary.rows_coerced,
            "ledger rows needed coercion"
        );
    }
    debug!(rows_read, rows_kept, "normalized ledger");

    Ok(NormalizedLedger {
        transactions: TransactionSet::new(transactions),
        diagnostics,
        summary,
    })
}

/// Maps each known field to the source column carrying it.
fn resolve_columns(raw: &RawLedger) -> EngineResult<BTreeMap<LedgerField, String>> {
    let mut resolved = BTreeMap::new();
    for field in FIELD_POLICIES.iter().map(|policy| policy.field) {
        let wanted = field.column().to_ascii_lowercase();
        if let Some(column) = raw
            .columns
            .iter()
            .find(|column| column.trim().to_ascii_lowercase() == wanted)
        {
            resolved.insert(field, column.clone());
        }
    }

    if raw.columns.is_empty() && raw.rows.is_empty() {
        return Ok(resolved);
    }

    let missing = required_fields()
        .filter(|field| !resolved.contains_key(field))
        .map(|field| field.column().to_string())
        .collect::<Vec<String>>();
    if !missing.is_empty() {
        let row_indices = (1..=raw.rows.len() as i64).collect::<Vec<i64>>();
        return Err(EngineError::ledger_schema_mismatch(
            missing,
            raw.columns.clone(),
            row_indices,
        ));
    }

    Ok(resolved)
}

fn is_blank_row(row: &RawRow) -> bool {
    row.values().all(|value| coerce_text(Some(value)).is_none())
}

/// Runs every field through its policy; `None` when a drop-row field failed.
fn coerce_row(
    row_number: i64,
    row: &RawRow,
    columns: &BTreeMap<LedgerField, String>,
    context: &CoerceContext<'_>,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<Transaction> {
    let mut values = BTreeMap::new();
    let mut dropped = false;

    for policy in &FIELD_POLICIES {
        let cell = columns.get(&policy.field).and_then(|column| row.get(column));
        let value = match (policy.parse)(cell, context) {
            Some(value) => value,
            None => {
                let blank = coerce_text(cell).is_none();
                if let Some(code) = policy.warning_code
                    && (policy.warn_on_blank || !blank)
                {
                    warnings.push(CoercionWarning {
                        row: row_number,
                        field: policy.field.column().to_string(),
                        code: code.to_string(),
                        description: policy.failure_description(),
                        received: received_text(cell),
                    });
                }
                match policy.fallback_value() {
                    Some(fallback) => fallback,
                    None => {
                        dropped = true;
                        continue;
                    }
                }
            }
        };
        values.insert(policy.field, value);
    }

    if dropped {
        return None;
    }
    let mut take_text = |field: LedgerField| {
        values
            .remove(&field)
            .and_then(FieldValue::into_text)
            .unwrap_or_default()
    };
    let item = take_text(LedgerField::Item);
    let category = take_text(LedgerField::Category);
    let notes = take_text(LedgerField::Notes);
    let cost = values
        .get(&LedgerField::Cost)
        .and_then(FieldValue::as_cost)?;
    let date = values
        .get(&LedgerField::Date)
        .and_then(FieldValue::as_date)?;
    Some(Transaction::new(&item, &category, cost, date, &notes))
}
