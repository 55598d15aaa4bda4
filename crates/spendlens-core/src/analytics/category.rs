use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::bucket::{BucketSpan, bucket};
use crate::analytics::date::Granularity;
use crate::analytics::types::TransactionSet;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
    pub mean: f64,
    pub top_item: String,
    pub top_item_cost: f64,
}

/// Per-category rollup sorted by total descending, then name ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    pub rows: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn get(&self, category: &str) -> Option<&CategoryTotal> {
        self.rows.iter().find(|row| row.category == category)
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.rows.iter().map(|row| row.category.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Period × category totals. `cells[i]` lines up with `categories[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGrid {
    pub granularity: Granularity,
    pub categories: Vec<String>,
    pub periods: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub start: NaiveDate,
    pub cells: Vec<f64>,
    pub total: f64,
}

struct Accumulator {
    total: f64,
    count: usize,
    top_item: String,
    top_item_cost: f64,
}

pub fn by_category(transactions: &TransactionSet) -> CategoryTotals {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for transaction in transactions {
        let entry = groups
            .entry(transaction.category.as_str())
            .or_insert_with(|| Accumulator {
                total: 0.0,
                count: 0,
                top_item: transaction.item.clone(),
                top_item_cost: transaction.cost,
            });
        entry.total += transaction.cost;
        entry.count += 1;
        // Strictly greater keeps the first occurrence on ties.
        if transaction.cost > entry.top_item_cost {
            entry.top_item = transaction.item.clone();
            entry.top_item_cost = transaction.cost;
        }
    }

    let mut rows = groups
        .into_iter()
        .map(|(category, accumulator)| CategoryTotal {
            category: category.to_string(),
            total: accumulator.total,
            count: accumulator.count,
            mean: accumulator.total / accumulator.count as f64,
            top_item: accumulator.top_item,
            top_item_cost: accumulator.top_item_cost,
        })
        .collect::<Vec<CategoryTotal>>();
    // Groups arrive name-ordered, so a stable sort on total settles ties by name.
    rows.sort_by(|left, right| right.total.total_cmp(&left.total));

    debug!(categories = rows.len(), "aggregated categories");
    CategoryTotals { rows }
}

pub fn category_month_grid(transactions: &TransactionSet, span: BucketSpan) -> CategoryGrid {
    category_grid(transactions, Granularity::Month, span)
}

pub fn category_year_totals(transactions: &TransactionSet) -> CategoryGrid {
    let span = match transactions.date_bounds() {
        Some((start, end)) => BucketSpan::Range { start, end },
        None => BucketSpan::Inferred,
    };
    category_grid(transactions, Granularity::Year, span)
}

fn category_grid(
    transactions: &TransactionSet,
    granularity: Granularity,
    span: BucketSpan,
) -> CategoryGrid {
    let periods = bucket(transactions, granularity, span);
    let categories = transactions
        .iter()
        .filter(|transaction| span.contains(transaction.date))
        .map(|transaction| transaction.category.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect::<Vec<String>>();

    let mut cells: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for transaction in transactions {
        if !span.contains(transaction.date) {
            continue;
        }
        *cells
            .entry((granularity.anchor(transaction.date), transaction.category.as_str()))
            .or_insert(0.0) += transaction.cost;
    }

    let rows = periods
        .buckets
        .iter()
        .map(|period| GridRow {
            start: period.start,
            cells: categories
                .iter()
                .map(|category| {
                    cells
                        .get(&(period.start, category.as_str()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect(),
            total: period.total,
        })
        .collect();

    CategoryGrid {
        granularity,
        categories,
        periods: rows,
    }
}
