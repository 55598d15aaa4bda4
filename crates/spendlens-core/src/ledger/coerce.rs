use chrono::NaiveDate;
use serde_json::Value;

use crate::analytics::date::parse_ledger_date;
use crate::analytics::types::MISCELLANEOUS_CATEGORY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LedgerField {
    Item,
    Category,
    Cost,
    Date,
    Notes,
}

impl LedgerField {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Category => "Category",
            Self::Cost => "Cost",
            Self::Date => "Date",
            Self::Notes => "Notes",
        }
    }
}

/// Value put in place of a field that could not be coerced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Text(&'static str),
    Number(f64),
}

impl Fallback {
    fn value(self) -> FieldValue {
        match self {
            Self::Text(text) => FieldValue::Text(text.to_string()),
            Self::Number(number) => FieldValue::Cost(number),
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Text("") => "an empty value".to_string(),
            Self::Text(text) => text.to_string(),
            Self::Number(number) => format!("{number:.2}"),
        }
    }
}

/// What happens to a row when a field cannot be coerced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnFailure {
    DropRow,
    Substitute(Fallback),
}

/// A successfully coerced cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Cost(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_cost(&self) -> Option<f64> {
        match self {
            Self::Cost(cost) => Some(*cost),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }
}

/// Ledger-wide settings a field parser may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoerceContext<'a> {
    pub canonical_categories: Option<&'a [String]>,
}

pub type FieldParser = fn(Option<&Value>, &CoerceContext<'_>) -> Option<FieldValue>;

#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy {
    pub field: LedgerField,
    /// Column must exist in the source; a missing column is a schema error.
    pub required: bool,
    pub parse: FieldParser,
    pub on_failure: OnFailure,
    /// Diagnostic code emitted on failure. `None` means fall back silently.
    pub warning_code: Option<&'static str>,
    /// A blank cell falls back silently when false.
    pub warn_on_blank: bool,
    pub expected: &'static str,
}

impl FieldPolicy {
    /// Diagnostic text for a cell this policy rejected.
    pub fn failure_description(&self) -> String {
        let column = self.field.column();
        let expected = self.expected;
        match self.on_failure {
            OnFailure::DropRow => {
                format!("{column} must be a {expected}; the row was dropped.")
            }
            OnFailure::Substitute(fallback) => format!(
                "{column} must be a {expected}; {} was used.",
                fallback.describe()
            ),
        }
    }

    pub fn fallback_value(&self) -> Option<FieldValue> {
        match self.on_failure {
            OnFailure::DropRow => None,
            OnFailure::Substitute(fallback) => Some(fallback.value()),
        }
    }
}

pub const FIELD_POLICIES: [FieldPolicy; 5] = [
    FieldPolicy {
        field: LedgerField::Item,
        required: true,
        parse: parse_plain_text,
        on_failure: OnFailure::DropRow,
        warning_code: Some("missing_item"),
        warn_on_blank: true,
        expected: "non-empty item name",
    },
    FieldPolicy {
        field: LedgerField::Category,
        required: true,
        parse: parse_category,
        on_failure: OnFailure::Substitute(Fallback::Text(MISCELLANEOUS_CATEGORY)),
        warning_code: Some("category_defaulted"),
        warn_on_blank: false,
        expected: "category from the configured list",
    },
    FieldPolicy {
        field: LedgerField::Cost,
        required: true,
        parse: parse_cost,
        on_failure: OnFailure::Substitute(Fallback::Number(0.0)),
        warning_code: Some("invalid_cost"),
        warn_on_blank: true,
        expected: "number, optionally with a currency symbol or thousands separators",
    },
    FieldPolicy {
        field: LedgerField::Date,
        required: true,
        parse: parse_date,
        on_failure: OnFailure::DropRow,
        warning_code: Some("invalid_date"),
        warn_on_blank: true,
        expected: "calendar date such as 2024-01-31 or 31/01/2024",
    },
    FieldPolicy {
        field: LedgerField::Notes,
        required: false,
        parse: parse_plain_text,
        on_failure: OnFailure::Substitute(Fallback::Text("")),
        warning_code: None,
        warn_on_blank: false,
        expected: "free text",
    },
];

fn parse_plain_text(value: Option<&Value>, _context: &CoerceContext<'_>) -> Option<FieldValue> {
    coerce_text(value).map(FieldValue::Text)
}

fn parse_category(value: Option<&Value>, context: &CoerceContext<'_>) -> Option<FieldValue> {
    let category = coerce_text(value)?;
    let Some(canonical) = context.canonical_categories else {
        return Some(FieldValue::Text(category));
    };
    canonical
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(&category))
        .map(|matched| FieldValue::Text(matched.clone()))
}

fn parse_cost(value: Option<&Value>, _context: &CoerceContext<'_>) -> Option<FieldValue> {
    coerce_cost(value).map(FieldValue::Cost)
}

fn parse_date(value: Option<&Value>, _context: &CoerceContext<'_>) -> Option<FieldValue> {
    coerce_date(value).map(FieldValue::Date)
}

pub fn policy_for(field: LedgerField) -> &'static FieldPolicy {
    match field {
        LedgerField::Item => &FIELD_POLICIES[0],
        LedgerField::Category => &FIELD_POLICIES[1],
        LedgerField::Cost => &FIELD_POLICIES[2],
        LedgerField::Date => &FIELD_POLICIES[3],
        LedgerField::Notes => &FIELD_POLICIES[4],
    }
}

pub fn required_fields() -> impl Iterator<Item = LedgerField> {
    FIELD_POLICIES
        .iter()
        .filter(|policy| policy.required)
        .map(|policy| policy.field)
}

/// Trimmed text, or `None` when absent, null, or blank.
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    let text = display_value(value?)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

pub fn coerce_cost(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64().filter(|parsed| parsed.is_finite()),
        Value::String(text) => parse_cost_text(text),
        _ => None,
    }
}

pub fn coerce_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::String(text) => parse_ledger_date(text),
        _ => None,
    }
}

/// Raw cell rendered for diagnostics.
pub fn received_text(value: Option<&Value>) -> Option<String> {
    value.and_then(display_value)
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

fn parse_cost_text(text: &str) -> Option<f64> {
    let mut remaining = text.trim();
    let negative = remaining.starts_with('-');
    if negative {
        remaining = remaining[1..].trim_start();
    }
    remaining = remaining
        .trim_start_matches(['$', '£', '€', '¥'])
        .trim_start();

    let cleaned = remaining
        .chars()
        .filter(|character| *character != ',')
        .collect::<String>();
    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|character| character.is_ascii_digit() || character == '.')
    {
        return None;
    }

    let parsed = cleaned.parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(if negative { -parsed } else { parsed })
}
