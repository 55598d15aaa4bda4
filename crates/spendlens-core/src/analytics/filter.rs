use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::types::{Transaction, TransactionSet};

/// Queries shorter than this (after trimming) do not filter.
pub const SEARCH_MIN_CHARS: usize = 2;

/// Inclusive date bounds; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Tightest range satisfying both bounds.
    pub fn intersect(&self, other: &DateRange) -> DateRange {
        DateRange {
            from: later(self.from, other.from),
            to: earlier(self.to, other.to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Inclusive cost bounds; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl CostRange {
    pub fn contains(&self, cost: f64) -> bool {
        self.min.is_none_or(|min| cost >= min) && self.max.is_none_or(|max| cost <= max)
    }
}

/// Conjunction of predicates applied to every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub dates: DateRange,
    pub costs: CostRange,
    /// Any-of match; empty means every category.
    pub categories: BTreeSet<String>,
    pub search: Option<String>,
}

impl FilterSet {
    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = self.dates.intersect(&dates);
        self
    }

    /// Search query that will actually be applied, lowercased.
    pub fn effective_search(&self) -> Option<String> {
        let query = self.search.as_deref()?.trim();
        if query.chars().count() < SEARCH_MIN_CHARS {
            return None;
        }
        Some(query.to_lowercase())
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_with_search(transaction, self.effective_search().as_deref())
    }

    fn matches_with_search(&self, transaction: &Transaction, search: Option<&str>) -> bool {
        if !self.dates.contains(transaction.date) || !self.costs.contains(transaction.cost) {
            return false;
        }

        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|category| category.eq_ignore_ascii_case(&transaction.category))
        {
            return false;
        }

        match search {
            Some(query) => {
                transaction.item.to_lowercase().contains(query)
                    || transaction.notes.to_lowercase().contains(query)
            }
            None => true,
        }
    }
}

pub fn filter(transactions: &TransactionSet, filters: &FilterSet) -> TransactionSet {
    let search = filters.effective_search();
    let filtered = transactions
        .retain(|transaction| filters.matches_with_search(transaction, search.as_deref()));
    debug!(
        before = transactions.len(),
        after = filtered.len(),
        "applied transaction filters"
    );
    filtered
}

fn later(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Option<NaiveDate> {
    match (left, right) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn earlier(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Option<NaiveDate> {
    match (left, right) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
