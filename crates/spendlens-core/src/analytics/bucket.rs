use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::date::{Granularity, first_of_month, last_of_year};
use crate::analytics::types::TransactionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSpan {
    /// Only periods that contain transactions.
    Inferred,
    /// Every period from `start` to `end`, zero-filled.
    Range { start: NaiveDate, end: NaiveDate },
    /// Every period of one calendar year, zero-filled.
    Year(i32),
}

impl BucketSpan {
    /// Inclusive date bounds, or `None` for an inferred span.
    pub fn bounds(self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Inferred => None,
            Self::Range { start, end } => Some((start.min(end), start.max(end))),
            Self::Year(year) => Some((first_of_month(year, 1)?, last_of_year(year)?)),
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        match self {
            Self::Inferred => true,
            _ => self
                .bounds()
                .is_some_and(|(start, end)| date >= start && date <= end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: NaiveDate,
    pub total: f64,
    pub count: usize,
}

impl Bucket {
    pub fn is_active(&self) -> bool {
        self.total != 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucketSeries {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
}

impl TimeBucketSeries {
    pub fn totals(&self) -> Vec<f64> {
        self.buckets.iter().map(|bucket| bucket.total).collect()
    }

    pub fn active(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|bucket| bucket.is_active())
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|bucket| bucket.total).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

pub fn bucket(
    transactions: &TransactionSet,
    granularity: Granularity,
    span: BucketSpan,
) -> TimeBucketSeries {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for transaction in transactions {
        if !span.contains(transaction.date) {
            continue;
        }
        let entry = sums
            .entry(granularity.anchor(transaction.date))
            .or_insert((0.0, 0));
        entry.0 += transaction.cost;
        entry.1 += 1;
    }

    let buckets = match span.bounds() {
        None => sums
            .into_iter()
            .map(|(start, (total, count))| Bucket {
                start,
                total,
                count,
            })
            .collect(),
        Some((start, end)) => dense_buckets(granularity, start, end, &sums),
    };

    debug!(
        granularity = granularity.as_str(),
        buckets = buckets.len(),
        "bucketed transactions"
    );
    TimeBucketSeries {
        granularity,
        buckets,
    }
}

/// Monthly detail view: all 12 months when the data sits in one calendar
/// year, otherwise only months with data.
pub fn month_details(transactions: &TransactionSet) -> TimeBucketSeries {
    let years = transactions
        .iter()
        .map(|transaction| transaction.year())
        .collect::<BTreeSet<i32>>();
    let span = match years.iter().next() {
        Some(year) if years.len() == 1 => BucketSpan::Year(*year),
        _ => BucketSpan::Inferred,
    };
    bucket(transactions, Granularity::Month, span)
}

fn dense_buckets(
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
    sums: &BTreeMap<NaiveDate, (f64, usize)>,
) -> Vec<Bucket> {
    let last = granularity.anchor(end);
    let mut cursor = granularity.anchor(start);
    let mut buckets = Vec::new();
    while cursor <= last {
        let (total, count) = sums.get(&cursor).copied().unwrap_or((0.0, 0));
        buckets.push(Bucket {
            start: cursor,
            total,
            count,
        });
        let next = granularity.advance(cursor);
        if next <= cursor {
            break;
        }
        cursor = next;
    }
    buckets
}
