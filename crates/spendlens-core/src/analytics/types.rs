use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

pub const MISCELLANEOUS_CATEGORY: &str = "Miscellaneous";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub item: String,
    pub category: String,
    pub cost: f64,
    pub date: NaiveDate,
    pub notes: String,
}

impl Transaction {
    pub fn new(item: &str, category: &str, cost: f64, date: NaiveDate, notes: &str) -> Self {
        Self {
            item: item.to_string(),
            category: category.to_string(),
            cost,
            date,
            notes: notes.to_string(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month_num(&self) -> u32 {
        self.date.month()
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.date.month())
    }
}

pub fn month_name(month: u32) -> &'static str {
    let index = usize::try_from(month.clamp(1, 12) - 1).unwrap_or(0);
    MONTH_NAMES[index]
}

/// Ordered, read-only sequence of transactions in ledger order.
///
/// Cloning shares the underlying storage, so one loaded ledger can be handed
/// to any number of readers. There is no mutating API: narrowing produces a
/// new set.
#[derive(Debug, Clone, Default)]
pub struct TransactionSet {
    rows: Arc<[Transaction]>,
}

impl TransactionSet {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows: rows.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.cost).collect()
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let earliest = self.rows.iter().map(|row| row.date).min()?;
        let latest = self.rows.iter().map(|row| row.date).max()?;
        Some((earliest, latest))
    }

    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&Transaction) -> bool,
    {
        Self::new(self.rows.iter().filter(|row| keep(row)).cloned().collect())
    }
}

impl<'a> IntoIterator for &'a TransactionSet {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Transaction> for TransactionSet {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
